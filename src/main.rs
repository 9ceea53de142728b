//! Sprobot main entry point
//!
//! Command-line interface for the sofifa roster harvester.

use clap::Parser;
use sprobot::config::{CrawlConfig, DEFAULT_WORKERS};
use sprobot::crawler::{build_http_client, crawl_details, discover_players};
use sprobot::output::write_players;
use sprobot::url::parse_start_url;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sprobot: a roster harvester for the sofifa player catalog
///
/// Sprobot walks the paginated player listing starting at START_URL,
/// then fetches every player's detail page with a pool of parallel
/// workers and writes the aggregated collection to a JSON file.
#[derive(Parser, Debug)]
#[command(name = "sprobot")]
#[command(version = "1.0.0")]
#[command(about = "Harvests the sofifa player catalog", long_about = None)]
struct Cli {
    /// First listing page to crawl
    #[arg(value_name = "START_URL")]
    start: String,

    /// Number of parallel detail-page workers
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Where to write the aggregated JSON collection
    #[arg(short, long, default_value = "data.json")]
    output: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = CrawlConfig {
        workers: cli.workers,
        output: cli.output,
        ..CrawlConfig::default()
    };
    config.validate()?;

    let start_url = parse_start_url(&cli.start)?;
    let client = build_http_client()?;

    // Discovery is fail-fast: any listing-page error aborts the run
    // before detail work starts, and no output file is produced.
    tracing::info!("Fetching player list from {}", start_url);
    let players = match discover_players(&client, start_url, &config).await {
        Ok(players) => players,
        Err(e) => {
            tracing::error!("Discovery failed: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("Got {} players", players.len());

    let (records, progress) = crawl_details(&client, players, &config).await?;
    tracing::info!("{}", progress);

    write_players(&config.output, &records)?;
    tracing::info!("Complete");

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sprobot=info,warn"),
            1 => EnvFilter::new("sprobot=debug,info"),
            2 => EnvFilter::new("sprobot=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
