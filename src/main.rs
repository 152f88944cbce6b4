//! Disclosure-Tracker main entry point
//!
//! This is the command-line interface for the trade disclosure tracker.

use anyhow::Context;
use clap::Parser;
use disclosure_tracker::config::{load_config_with_hash, validate, Config};
use disclosure_tracker::crawler::{run_full_crawl, PollScheduler, TokioTimer};
use disclosure_tracker::output::{load_statistics, print_statistics};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Disclosure-Tracker: a congressional trade disclosure monitor
///
/// By default the tracker runs forever, checking the first pages of the trades
/// listing every poll interval and appending trades it has not stored yet.
#[derive(Parser, Debug)]
#[command(name = "disclosure-tracker")]
#[command(version = "1.0.0")]
#[command(about = "Tracks newly disclosed congressional trades", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl every page once and overwrite the store
    #[arg(long, conflicts_with_all = ["once", "stats", "dry_run"])]
    crawl: bool,

    /// Run a single incremental check and exit
    #[arg(long, conflicts_with_all = ["crawl", "stats", "dry_run"])]
    once: bool,

    /// Show statistics for the store and exit
    #[arg(long, conflicts_with_all = ["crawl", "once", "dry_run"])]
    stats: bool,

    /// Validate config and show the effective settings without fetching
    #[arg(long, conflicts_with_all = ["crawl", "once", "stats"])]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_deref())?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.crawl {
        handle_crawl(&config).await?;
    } else {
        handle_monitor(&config, cli.once).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("disclosure_tracker=info,warn"),
            1 => EnvFilter::new("disclosure_tracker=debug,info"),
            2 => EnvFilter::new("disclosure_tracker=trace,debug"),
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

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Disclosure-Tracker Dry Run ===\n");

    println!("Source:");
    println!("  Base URL: {}", config.source.base_url);
    println!("  Start path: {}", config.source.start_path);
    println!("  User agent: {}", config.source.user_agent);
    println!("  Timeout: {}s", config.source.timeout_secs);

    println!("\nTraversal:");
    println!("  Page delay: {}ms", config.traversal.page_delay_ms);
    println!(
        "  Incremental page cap: {}",
        config.traversal.incremental_page_cap
    );

    println!("\nMonitor:");
    println!("  Poll interval: {}s", config.monitor.poll_interval_secs);

    println!("\nOutput:");
    println!("  Store: {}", config.output.store_path);

    match config.start_url() {
        Ok(url) => println!("\n✓ Would start at {}", url),
        Err(e) => println!("\n✗ {}", e),
    }
}

/// Handles the --stats mode: summarizes the store
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Store: {}\n", config.output.store_path);

    let stats = load_statistics(Path::new(&config.output.store_path))
        .context("failed to read the store")?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --crawl mode: one full crawl over every page
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Starting full crawl into {}", config.output.store_path);

    let report = run_full_crawl(config).await.context("full crawl failed")?;
    if report.fetch_failed() {
        tracing::warn!("Crawl stopped early: {}", report.stop_reason);
    }

    Ok(())
}

/// Handles the default monitor mode (and --once)
async fn handle_monitor(config: &Config, once: bool) -> anyhow::Result<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl+C, stopping after the current cycle");
            let _ = shutdown_tx.send(true);
            // Keep the sender alive so the scheduler sees the signal.
            std::future::pending::<()>().await;
        }
    });

    let mut scheduler = PollScheduler::new(config, TokioTimer, shutdown_rx)
        .context("failed to start monitor")?;
    if once {
        scheduler = scheduler.with_max_cycles(1);
    }

    tracing::info!(
        "Monitoring {} every {}s ({} trades already stored)",
        config.source.base_url,
        config.monitor.poll_interval_secs,
        scheduler.known_records()
    );
    scheduler.run().await;

    Ok(())
}
