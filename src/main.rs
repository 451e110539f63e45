//! Card-Harvest main entry point
//!
//! This is the command-line interface for the Card-Harvest price crawler.

use card_harvest::config::{load_config_with_hash, Config};
use card_harvest::crawler::{run_crawl, select_categories};
use card_harvest::output::{load_statistics, log_reports, print_statistics};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Card-Harvest: a resumable trading-card price crawler
///
/// Card-Harvest walks each configured category, expands its sets into card
/// pages and appends one row per card to the category's store. Cards already
/// in a store are skipped, so an interrupted run can simply be started again.
#[derive(Parser, Debug)]
#[command(name = "card-harvest")]
#[command(version)]
#[command(about = "A resumable trading-card price crawler", long_about = None)]
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

    /// Only crawl the named category (repeatable)
    #[arg(long = "category", value_name = "NAME")]
    categories: Vec<String>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show how many cards each category store holds and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &cli.categories)?;
    } else if cli.stats {
        handle_stats(&config, &cli.categories)?;
    } else {
        handle_crawl(&config, &cli.categories).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("card_harvest=info,warn"),
            1 => EnvFilter::new("card_harvest=debug,info"),
            2 => EnvFilter::new("card_harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, only: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let categories = select_categories(config, only)?;

    println!("=== Card-Harvest Dry Run ===\n");

    let crawler = &config.crawler;
    println!("Crawler Configuration:");
    println!("  Max retries: {}", crawler.max_retries);
    println!("  Flush threshold: {}", crawler.flush_threshold);
    println!(
        "  Scroll: stop after {} unchanged rounds (max {})",
        crawler.scroll_stable_threshold, crawler.max_scroll_rounds
    );
    println!("  Wait timeout: {}ms", crawler.wait_timeout_ms);
    println!("  Retry backoff: {}ms", crawler.retry_backoff_ms);
    println!(
        "  Pacing: {}-{}ms",
        crawler.pacing_min_ms, crawler.pacing_max_ms
    );

    println!("\nDriver:");
    println!("  User agent: {}", config.driver.user_agent);
    println!("  Request timeout: {}ms", config.driver.request_timeout_ms);

    println!("\nSelectors:");
    for (name, selector) in config.selectors.entries() {
        println!("  {}: {}", name, selector);
    }

    println!("\nCategories ({}):", categories.len());
    for category in &categories {
        println!("  - {} (filter '{}')", category.name, category.filter);
        println!("    start: {}", category.start_url);
        println!("    store: {}", category.store);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows row counts of each category store
fn handle_stats(config: &Config, only: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let categories = select_categories(config, only)?;
    let stats = load_statistics(&categories)?;
    print_statistics(&stats);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, only: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Crawling {} categories",
        if only.is_empty() {
            config.categories.len()
        } else {
            only.len()
        }
    );

    match run_crawl(config, only).await {
        Ok(reports) => {
            log_reports(&reports);
            let failed = reports.iter().filter(|r| !r.is_success()).count();
            if failed > 0 {
                tracing::warn!("{} of {} categories stopped early", failed, reports.len());
            } else {
                tracing::info!("Crawl completed successfully");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
