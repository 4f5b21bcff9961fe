//! # Folio
//!
//! A personal-portfolio backend, usable both as a standalone binary and as a
//! library. Content (personal info, skills, work experience, education,
//! projects) is served read-only to the public and managed through a
//! bearer-token admin API backed by SQLite and a filesystem blob store.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use folio::auth::TokenService;
//! use folio::blob::BlobStorage;
//! use folio::config::AppConfig;
//! use folio::server::{AppState, create_router};
//! use folio::store::{SqliteStore, Store};
//!
//! let config = AppConfig::default();
//! let store = SqliteStore::new(config.db_path())?;
//! store.initialize()?;
//!
//! let state = Arc::new(AppState {
//!     store: Arc::new(store),
//!     blobs: BlobStorage::new(&config.data_dir),
//!     tokens: TokenService::new(&config.jwt_secret, config.token_ttl_minutes),
//!     config,
//! });
//! let router = create_router(state);
//! // Serve with axum...
//! ```

pub mod auth;
pub mod blob;
pub mod config;
pub mod error;
pub mod mapping;
pub mod server;
pub mod store;
pub mod types;
