//! Crawler module for the ingestion pipeline
//!
//! This module contains the core pipeline, including:
//! - HTTP fetching with timeout and error classification
//! - Trade table extraction and next-page discovery
//! - Page traversal in full-crawl and incremental modes
//! - The poll scheduler that runs incremental traversals forever

mod extractor;
mod fetcher;
mod navigator;
mod parser;
mod scheduler;
mod timer;
mod traversal;

pub use extractor::{extract_records, Extraction, ParseWarning, FIELD_COUNT, TABLE_SELECTOR};
pub use fetcher::{build_http_client, Fetcher};
pub use navigator::{find_next_page, NextPage, NEXT_PAGE_SELECTOR};
pub use parser::{parse_page, ParsedPage};
pub use scheduler::{CycleReport, PollScheduler, SchedulerSummary};
pub use timer::{Timer, TokioTimer};
pub use traversal::{StopReason, Traversal, TraversalReport};

use crate::config::Config;
use crate::storage::{CsvStore, OpenMode};
use crate::TrackerError;
use std::path::Path;

/// Runs a one-shot full crawl, overwriting the configured store
///
/// # Arguments
///
/// * `config` - The tracker configuration
///
/// # Returns
///
/// * `Ok(TraversalReport)` - Crawl finished (possibly early on a fetch failure)
/// * `Err(TrackerError)` - The store could not be written
///
/// # Example
///
/// ```no_run
/// use disclosure_tracker::config::Config;
/// use disclosure_tracker::crawler::run_full_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_full_crawl(&Config::default()).await?;
/// println!("{} trades written", report.records_appended);
/// # Ok(())
/// # }
/// ```
pub async fn run_full_crawl(config: &Config) -> Result<TraversalReport, TrackerError> {
    let traversal = Traversal::from_config(config, TokioTimer)?;
    let path = Path::new(&config.output.store_path);
    let mut store = CsvStore::open(path, OpenMode::Truncate)?;

    let report = traversal.full_crawl(&mut store).await?;
    tracing::info!(
        "Finished scraping. {} trades from {} pages saved to {}",
        report.records_appended,
        report.pages_visited,
        path.display()
    );

    Ok(report)
}
