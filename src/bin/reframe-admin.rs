use std::sync::Arc;

use clap::{Parser, Subcommand};
use reframe::config::{AppConfig, ConfigError};
use reframe::db;
use reframe::error::ErrorCode;
use reframe::services::account::{self, AccountError};
use reframe::store::{FrameStore, PgStore};

#[derive(Debug, thiserror::Error)]
enum AdminError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Account(#[from] AccountError),
}

impl ErrorCode for AdminError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Database(_) => "E_DATABASE",
            Self::Account(e) => e.error_code(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "reframe-admin", about = "Provision reframe users and edit secrets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a user with a first collection and print their edit link.
    CreateUser { username: String },
    /// Revoke a user's edit secrets, issue a new one and print the edit link.
    RotateSecret { username: String },
}

async fn run(cli: Cli) -> Result<String, AdminError> {
    let config = AppConfig::from_env()?;
    let pool = db::init_pool(&config.database_url, config.db_max_connections).await?;
    let store: Arc<dyn FrameStore> = Arc::new(PgStore::new(pool));

    let provisioned = match cli.command {
        Command::CreateUser { username } => account::create_user(store.as_ref(), &username).await?,
        Command::RotateSecret { username } => account::rotate_secret(store.as_ref(), &username).await?,
    };

    Ok(account::edit_link(&config.public_base_url, &provisioned.user.username, &provisioned.secret))
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    reframe::init_tracing();

    match run(Cli::parse()).await {
        Ok(link) => println!("{link}"),
        Err(e) => {
            tracing::error!(error = %e, code = e.error_code(), "admin command failed");
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
