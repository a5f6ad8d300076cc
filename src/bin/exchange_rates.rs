//! Print an NBP exchange rate report as JSON.
//!
//! Usage: `exchange-rates [days] [codes...]`, with the same rules as the
//! chat `exchange` command.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use exchange_hub::config::DEFAULT_CONFIG_PATH;
use exchange_hub::exchange::{parse_args, report_json};
use exchange_hub::{Config, NbpFetcher, RateAggregator};

/// Fetch exchange rates from the NBP API and print them as JSON.
#[derive(Debug, Parser)]
#[command(name = "exchange-rates", version, about)]
struct Args {
    /// Path to the configuration file (default: config.toml, if present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Optional day count (1-10) followed by extra currency codes.
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::load_requested(args.config.as_deref()) {
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
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        return ExitCode::FAILURE;
    }
    exchange_hub::logging::init_console_only(&config.logging.level);

    let fetcher = match NbpFetcher::new(&config.rates) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let aggregator = RateAggregator::new(fetcher, Duration::from_secs(config.rates.timeout_secs));

    let query = parse_args(&args.args, config.rates.max_days);
    let result = aggregator.aggregate(&query).await;

    match serde_json::to_string_pretty(&report_json(&result)) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to render report: {e}");
            ExitCode::FAILURE
        }
    }
}
