use anyhow::Result;
use clap::Parser;
use parish_api::{AppState, create_router_with_state, serve};
use parish_config::{Cli, LogFormat};
use parish_core::{logging, resolve_email_service};
use parish_storage::Backend;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config;
    config.validate()?;

    // Initialize structured logging
    let log_config = logging::LogConfig {
        format: match config.log_format {
            LogFormat::Json => logging::LogFormat::Json,
            LogFormat::Text => logging::LogFormat::Full,
            LogFormat::Auto => {
                if std::io::IsTerminal::is_terminal(&std::io::stdout()) {
                    logging::LogFormat::Full
                } else {
                    logging::LogFormat::Json
                }
            },
        },
        filter: Some(config.log_level.clone()),
        ..Default::default()
    };
    if let Err(e) = logging::init_logging(log_config) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Parish");
    if config.is_dev_mode() {
        tracing::info!("Development mode enabled via --dev-mode flag");
    }

    let storage = Backend::memory();
    tracing::info!(backend = %storage.backend_type(), "Storage initialized");

    let email = resolve_email_service(&config).await?;
    let state = AppState::new(&config, storage, email)?;
    let router = create_router_with_state(state);

    serve(&config.listen.to_string(), router).await?;

    tracing::info!("Shutting down gracefully");
    Ok(())
}
