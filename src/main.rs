use std::fs;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use folio::auth::TokenService;
use folio::blob::BlobStorage;
use folio::config::{AppConfig, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_TOKEN_TTL_MINUTES};
use folio::server::{AppState, create_router};
use folio::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "A self-hosted portfolio backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database and uploaded files
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Secret used to sign admin access tokens
        #[arg(long, env = "FOLIO_JWT_SECRET", hide_env_values = true)]
        jwt_secret: String,

        /// Access token lifetime in minutes
        #[arg(long, env = "FOLIO_TOKEN_TTL_MINUTES", default_value_t = DEFAULT_TOKEN_TTL_MINUTES)]
        token_ttl_minutes: i64,

        /// Admin username
        #[arg(long, env = "FOLIO_ADMIN_USERNAME")]
        admin_username: String,

        /// Admin password
        #[arg(long, env = "FOLIO_ADMIN_PASSWORD", hide_env_values = true)]
        admin_password: String,

        /// Maximum upload size in bytes
        #[arg(long, env = "FOLIO_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
        max_upload_bytes: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("folio=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            data_dir,
            jwt_secret,
            token_ttl_minutes,
            admin_username,
            admin_password,
            max_upload_bytes,
        } => {
            let config = AppConfig {
                host,
                port,
                data_dir: data_dir.into(),
                jwt_secret,
                token_ttl_minutes,
                admin_username,
                admin_password,
                max_upload_bytes,
                ..AppConfig::default()
            };
            config.validate()?;

            fs::create_dir_all(&config.data_dir)?;

            let store = SqliteStore::new(config.db_path())?;
            store.initialize()?;

            let blobs = BlobStorage::new(&config.data_dir);
            let tokens = TokenService::new(&config.jwt_secret, config.token_ttl_minutes);

            let addr = config.socket_addr()?;
            let state = Arc::new(AppState {
                store: Arc::new(store),
                blobs,
                tokens,
                config,
            });

            let app = create_router(state);

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
