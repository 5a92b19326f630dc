//! # TPS Runtime Binary
//!
//! Loads configuration, starts the TPS voting core and runs until Ctrl+C.
//!
//! Set `TPS_STRICT_CONFIG=1` to refuse to start on a configuration that fails
//! production validation.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tps_runtime::{load_config, TpsRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config();

    if let Err(e) = config.validate_for_production() {
        if std::env::var("TPS_STRICT_CONFIG").is_ok_and(|v| v == "1") {
            return Err(e).context("Refusing to start with insecure configuration");
        }
        warn!("{}", e);
    }

    let runtime = TpsRuntime::new(config)?;
    runtime.start().await?;

    info!("TPS runtime is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;

    Ok(())
}
