mod admin;
pub mod dto;
mod public;
pub mod response;
mod router;
mod session;
pub mod validation;

pub use router::{AppState, create_router};
