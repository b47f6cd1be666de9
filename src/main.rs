//! mal-harvest main entry point
//!
//! This is the command-line interface for the mal-harvest anime data scraper.

use clap::Parser;
use mal_harvest::config::load_config_with_hash;
use mal_harvest::scrape::{harvest, RunOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// mal-harvest: a MyAnimeList table harvester
///
/// mal-harvest fetches the ranked top-anime list and the per-anime detail,
/// review, and recommendation pages, and writes one CSV table per stage.
#[derive(Parser, Debug)]
#[command(name = "mal-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A MyAnimeList table harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,

    /// Stop after writing the ranked list table
    #[arg(long, conflicts_with = "dry_run")]
    list_only: bool,

    /// Skip this many anime from the top of the list (overrides the config)
    #[arg(long, value_name = "N")]
    start_offset: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(offset) = cli.start_offset {
        config.resume.start_offset = offset;
    }

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_harvest(config, cli.list_only).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mal_harvest=info,warn"),
            1 => EnvFilter::new("mal_harvest=debug,info"),
            2 => EnvFilter::new("mal_harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be fetched
fn handle_dry_run(config: &mal_harvest::config::Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== mal-harvest Dry Run ===\n");

    println!("Scrape Configuration:");
    println!("  Item count: {}", config.scrape.item_count);
    println!("  Page size: {}", config.scrape.page_size);
    println!("  Worker pool size: {}", config.scrape.worker_pool_size);
    println!("  Courtesy delay: {}ms", config.scrape.courtesy_delay_ms);
    println!("  Retry delay: {}s", config.scrape.retry_delay_secs);

    println!("\nSite:");
    println!("  Top list URL: {}", config.site.top_list_url);
    println!("  Review suffix: {}", config.site.review_suffix);
    println!(
        "  Recommendation suffix: {}",
        config.site.recommendation_suffix
    );

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Request timeout: {}s", config.http.request_timeout_secs);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Individual files: {}", config.output.save_individual);

    if config.resume.start_offset > 0 || !config.resume.completed.is_empty() {
        println!("\nResume:");
        println!("  Start offset: {}", config.resume.start_offset);
        println!("  Completed URLs: {}", config.resume.completed.len());
    }

    let list_pages =
        (config.scrape.item_count + config.scrape.page_size - 1) / config.scrape.page_size;
    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would fetch {} list pages plus up to {} detail, review, and recommendation pages each",
        list_pages, config.scrape.item_count
    );

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: mal_harvest::config::Config,
    list_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Harvesting the top {} anime into {}",
        config.scrape.item_count,
        config.output.directory
    );

    let options = RunOptions { list_only };
    match harvest(config, options).await {
        Ok(summary) => {
            tracing::info!(
                "Harvest completed in {}s: {} list rows, {} details, {} reviews, {} recommendations, {} failed pages",
                (summary.finished_at - summary.started_at).num_seconds(),
                summary.list_rows,
                summary.detail_rows,
                summary.review_rows,
                summary.recommendation_rows,
                summary.failed_pages
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
