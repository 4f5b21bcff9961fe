use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Immutable application configuration, built once at startup and passed by
/// reference into every component that needs it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,

    /// Secret used to sign admin access tokens (HS256).
    pub jwt_secret: String,
    /// Access token lifetime in minutes.
    pub token_ttl_minutes: i64,

    /// The single admin identity. This is intentionally a single-tenant
    /// system; credentials come from configuration, not the database.
    pub admin_username: String,
    pub admin_password: String,

    pub max_upload_bytes: usize,
    pub allowed_image_types: Vec<String>,
    pub allowed_document_types: Vec<String>,
}

impl AppConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid listen address: {e}")))
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("folio.db")
    }

    #[must_use]
    pub fn is_allowed_image(&self, mime: &str) -> bool {
        self.allowed_image_types.iter().any(|t| t == mime)
    }

    #[must_use]
    pub fn is_allowed_document(&self, mime: &str) -> bool {
        self.allowed_document_types.iter().any(|t| t == mime)
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            return Err(Error::Config("token signing secret cannot be empty".into()));
        }
        if self.admin_username.is_empty() || self.admin_password.is_empty() {
            return Err(Error::Config("admin credentials cannot be empty".into()));
        }
        if self.token_ttl_minutes <= 0 {
            return Err(Error::Config("token lifetime must be positive".into()));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            jwt_secret: String::new(),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            admin_username: String::new(),
            admin_password: String::new(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_image_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
                "image/gif".to_string(),
            ],
            allowed_document_types: vec!["application/pdf".to_string()],
        }
    }
}
