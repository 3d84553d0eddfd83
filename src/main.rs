//! Account service binary
//!
//! ```sh
//! # Default config (~/.config/account-service/config.toml)
//! account-service
//!
//! # Custom config and port
//! account-service --config /etc/account-service/config.toml --api-port 9000
//!
//! # Validate config without starting
//! account-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use account_service::config::AppConfig;
use account_service::server::{init_tracing, ServerHandle, ServerOptions};
use account_service::shared::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "account-service",
    version,
    about = "User account registration, login and profile service"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "ACCOUNT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(account_service::default_config_path);
    let mut config = AppConfig::load(&config_path)?;

    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.validate()?;

    if cli.check {
        println!("Configuration is valid");
        println!("  Config file : {}", config_path.display());
        println!("  API address : {}", config.api_address());
        println!("  Database    : {}", config.database_config().redacted_url());
        println!("  Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start account service: {}", e);
            return Err(e);
        }
    };

    handle.install_signal_handler();
    handle.shutdown_signal().wait().await;
    handle.wait().await;
    Ok(())
}
