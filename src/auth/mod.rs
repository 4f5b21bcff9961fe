mod jwt;
mod middleware;

pub use jwt::TokenService;
pub use middleware::{AuthError, RequireAdmin};
