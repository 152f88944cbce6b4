//! Traversal controller - walks the paginated listing
//!
//! One algorithm serves both operating modes:
//! - Full crawl: every extracted record is appended, pagination is followed
//!   until it ends or cycles.
//! - Incremental: records are filtered through the [`DedupIndex`], at most
//!   `page_cap` pages are visited, and a page with no records ends the walk.
//!
//! A fetch failure ends the walk but is not an error: it shows up as
//! [`StopReason::FetchFailed`] in the report. Records appended before the
//! failure stay in the store.

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::navigator::NextPage;
use crate::crawler::parser::parse_page;
use crate::crawler::timer::Timer;
use crate::state::{DedupIndex, IdentityKey};
use crate::storage::{RecordSink, StorageResult, TradeRecord};
use crate::{FetchError, TrackerError};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Why a traversal ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The last page has no usable next-page link
    NoNextPage,

    /// The next-page link points at a page already visited in this traversal
    CycleDetected(Url),

    /// The incremental page cap was reached
    PageCapReached,

    /// Incremental mode: the trades table was present but had no records
    EmptyPage,

    /// Incremental mode: the trades table was missing from the page
    TableMissing,

    /// A page could not be fetched
    FetchFailed { url: Url, error: FetchError },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::NoNextPage => write!(f, "no next page"),
            StopReason::CycleDetected(url) => write!(f, "next page {} already visited", url),
            StopReason::PageCapReached => write!(f, "page cap reached"),
            StopReason::EmptyPage => write!(f, "page had no trades"),
            StopReason::TableMissing => write!(f, "trades table missing"),
            StopReason::FetchFailed { url, error } => write!(f, "fetch of {} failed: {}", url, error),
        }
    }
}

/// Outcome of one traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalReport {
    /// Pages fetched successfully
    pub pages_visited: u32,

    /// Records extracted across all visited pages
    pub records_seen: usize,

    /// Records written to the sink
    pub records_appended: usize,

    /// Rows dropped for having too few cells
    pub malformed_rows: usize,

    pub stop_reason: StopReason,
}

impl TraversalReport {
    /// True if the walk ended because a page could not be fetched
    pub fn fetch_failed(&self) -> bool {
        matches!(self.stop_reason, StopReason::FetchFailed { .. })
    }
}

/// Walks the listing starting from the configured first page
pub struct Traversal<T: Timer> {
    fetcher: Fetcher,
    start_url: Url,
    page_delay: Duration,
    page_cap: u32,
    timer: T,
}

impl<T: Timer> Traversal<T> {
    pub fn new(fetcher: Fetcher, start_url: Url, timer: T) -> Self {
        Self {
            fetcher,
            start_url,
            page_delay: Duration::from_secs(1),
            page_cap: 3,
            timer,
        }
    }

    /// Builds a traversal from configuration
    pub fn from_config(config: &Config, timer: T) -> Result<Self, TrackerError> {
        let fetcher = Fetcher::from_config(config)?;
        let start_url = config.start_url()?;

        Ok(Self::new(fetcher, start_url, timer)
            .with_page_delay(config.page_delay())
            .with_page_cap(config.traversal.incremental_page_cap))
    }

    /// Politeness delay between page fetches
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Page limit for incremental traversals (at least 1)
    pub fn with_page_cap(mut self, cap: u32) -> Self {
        self.page_cap = cap.max(1);
        self
    }

    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    /// Walks every page and appends every record, without deduplication
    pub async fn full_crawl<S: RecordSink>(
        &self,
        sink: &mut S,
    ) -> Result<TraversalReport, TrackerError> {
        self.walk(None, false, |record| {
            sink.append(&record)?;
            Ok(true)
        })
        .await
    }

    /// Walks at most `page_cap` pages and appends only records whose identity
    /// is not yet in `index`
    ///
    /// `report.records_appended` is the number of new records.
    pub async fn incremental<S: RecordSink>(
        &self,
        sink: &mut S,
        index: &mut DedupIndex,
    ) -> Result<TraversalReport, TrackerError> {
        self.walk(Some(self.page_cap), true, |record| {
            let key = IdentityKey::of(&record);
            if index.contains(&key) {
                return Ok(false);
            }
            sink.append(&record)?;
            index.insert(key);
            Ok(true)
        })
        .await
    }

    /// Shared page loop
    ///
    /// `accept` persists a record and reports whether it was written.
    async fn walk<F>(
        &self,
        page_cap: Option<u32>,
        stop_on_empty: bool,
        mut accept: F,
    ) -> Result<TraversalReport, TrackerError>
    where
        F: FnMut(TradeRecord) -> StorageResult<bool>,
    {
        let mut visited: HashSet<Url> = HashSet::new();
        let mut current = self.start_url.clone();
        let mut pages_visited = 0u32;
        let mut records_seen = 0usize;
        let mut records_appended = 0usize;
        let mut malformed_rows = 0usize;

        let stop_reason = loop {
            visited.insert(current.clone());
            tracing::info!("Scraping: {}", current);

            let body = match self.fetcher.fetch(&current).await {
                Ok(body) => body,
                Err(error) => {
                    tracing::warn!("Error fetching {}: {}", current, error);
                    break StopReason::FetchFailed {
                        url: current,
                        error,
                    };
                }
            };
            pages_visited += 1;

            let page = parse_page(&body, &current);
            let found = page.extraction.records.len();
            let table_found = page.extraction.table_found();
            records_seen += found;
            malformed_rows += page.extraction.malformed_rows();

            if stop_on_empty && found == 0 {
                if table_found {
                    tracing::info!("No trades on {}, stopping", current);
                    break StopReason::EmptyPage;
                }
                tracing::warn!("Trades table missing on {}, stopping", current);
                break StopReason::TableMissing;
            }

            let mut appended_here = 0usize;
            for record in page.extraction.records {
                if accept(record)? {
                    appended_here += 1;
                }
            }
            records_appended += appended_here;
            tracing::info!(
                "Found {} trades on {} ({} stored)",
                found,
                current,
                appended_here
            );

            let next = match page.next {
                NextPage::Found(next) => next,
                _ => break StopReason::NoNextPage,
            };

            if visited.contains(&next) {
                tracing::debug!("Next page {} already visited", next);
                break StopReason::CycleDetected(next);
            }

            if let Some(cap) = page_cap {
                if pages_visited >= cap {
                    break StopReason::PageCapReached;
                }
            }

            self.timer.sleep(self.page_delay).await;
            current = next;
        };

        tracing::debug!(
            "Traversal ended after {} pages: {}",
            pages_visited,
            stop_reason
        );

        Ok(TraversalReport {
            pages_visited,
            records_seen,
            records_appended,
            malformed_rows,
            stop_reason,
        })
    }
}
