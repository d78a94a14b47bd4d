//! Rentwise provisioning — connects to SurrealDB and applies pending
//! schema migrations.
//!
//! Configuration is read the same way the query layer reads it: defaults,
//! then the YAML file named by `RENTWISE_CONFIG`, then `RENTWISE_*`
//! environment variables.

use std::process::ExitCode;

use rentwise_db::{DbError, DbManager};
use rentwise_query::RentwiseConfig;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum ProvisionError {
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error(transparent)]
    Db(#[from] DbError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rentwise=info"));
    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!("Starting Rentwise provisioning...");

    match provision().await {
        Ok(()) => {
            info!(
                schema_version = rentwise_db::latest_version(),
                "Rentwise provisioning finished."
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Rentwise provisioning failed");
            ExitCode::FAILURE
        }
    }
}

async fn provision() -> Result<(), ProvisionError> {
    let config = RentwiseConfig::load()?;
    let manager = DbManager::connect(&config.db).await?;
    manager.migrate().await?;
    Ok(())
}
