//! AgriPredict gateway - Main Entry Point

use agripredict_gateway::{GatewayConfig, start_server};
use anyhow::Result;
use clap::{Arg, Command};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "agripredict_gateway=info,ml_inference=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let matches = Command::new("agripredict-gateway")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Crop yield, price, demand and advisory predictions over HTTP")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("agripredict.toml"),
        )
        .arg(
            Arg::new("routes")
                .long("routes")
                .help("Print available routes and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Print routes if requested
    if matches.get_flag("routes") {
        agripredict_gateway::server::print_routes();
        return Ok(());
    }

    // Load configuration
    let default_config = "agripredict.toml".to_string();
    let config_path = matches
        .get_one::<String>("config")
        .unwrap_or(&default_config);
    let config = match GatewayConfig::from_file(config_path) {
        Ok(config) => {
            info!("Loaded configuration from: {}", config_path);
            config
        }
        Err(e) => {
            error!("Failed to load config from {}: {:#}", config_path, e);
            info!("Using default configuration");
            GatewayConfig::default()
        }
    };

    // Print startup information
    info!("Starting AgriPredict gateway v{}", env!("CARGO_PKG_VERSION"));
    info!("Server will bind to: {}", config.server_address());
    info!("Storage:");
    info!("  Models: {}", config.storage.model_dir.display());
    info!("  Registrations: {}", config.storage.registration_dir.display());
    info!("  Artifact extension: {}", config.storage.artifact_extension);

    info!("Features enabled:");
    info!("  CORS: {}", config.cors.enabled);
    info!("  Metrics: {}", config.monitoring.metrics_enabled);
    info!("  Compression: {}", config.server.compression);
    info!("  Preload: {}", config.storage.preload_on_startup);

    // Start the server
    if let Err(e) = start_server(config).await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
