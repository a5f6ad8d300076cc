use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use exchange_hub::config::DEFAULT_CONFIG_PATH;
use exchange_hub::{CommandDispatcher, Config, HubServer, HubState};

/// Broadcast chat hub with an `exchange` rates command.
#[derive(Debug, Parser)]
#[command(name = "exchange-hub", version, about)]
struct Args {
    /// Path to the configuration file (default: config.toml, if present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host address to bind (overrides the configuration).
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides the configuration).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let mut config = match Config::load_requested(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let path = args
                .config
                .as_deref()
                .unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
            eprintln!("Failed to load {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    // Initialize logging
    if let Err(e) = exchange_hub::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        exchange_hub::logging::init_console_only(&config.logging.level);
    }

    info!("Exchange Hub");
    info!("Rates from {}", config.rates.base_url);

    let dispatcher = match CommandDispatcher::from_config(&config) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            error!("Failed to create exchange dispatcher: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let server = match HubServer::bind(&config.server, HubState::new(dispatcher)).await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to bind {}: {}", config.server.bind_addr(), e);
            return ExitCode::FAILURE;
        }
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown requested");
    };

    match server.run_until(shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
