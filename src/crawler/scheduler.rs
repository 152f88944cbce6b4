//! Poll scheduler - runs incremental traversals on a fixed cadence
//!
//! This module handles:
//! - Building the dedup index from the store once at startup
//! - Running one incremental traversal per cycle, never two at once
//! - Waiting the poll interval between cycles
//! - Stopping between cycles when shutdown is signalled
//!
//! There is no backoff and no jitter. A cycle whose fetch fails simply finds
//! zero new trades; the next one runs at the usual time.

use crate::config::Config;
use crate::crawler::timer::Timer;
use crate::crawler::traversal::{Traversal, TraversalReport};
use crate::state::DedupIndex;
use crate::storage::{CsvStore, OpenMode};
use crate::TrackerError;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Duration;
use tokio::sync::watch;

/// Result of one poll cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// 1-based cycle number within this process
    pub cycle: u64,

    pub started_at: DateTime<Utc>,

    /// None if the cycle failed on storage
    pub traversal: Option<TraversalReport>,
}

impl CycleReport {
    pub fn new_records(&self) -> usize {
        self.traversal
            .as_ref()
            .map(|t| t.records_appended)
            .unwrap_or(0)
    }
}

/// Totals over the lifetime of a scheduler run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerSummary {
    pub cycles: u64,
    pub new_records: usize,
}

/// Process-wide incremental polling loop
pub struct PollScheduler<T: Timer> {
    traversal: Traversal<T>,
    store: CsvStore,
    index: DedupIndex,
    interval: Duration,
    timer: T,
    shutdown: watch::Receiver<bool>,
    max_cycles: Option<u64>,
    cycles: u64,
}

impl<T: Timer> PollScheduler<T> {
    /// Creates a scheduler over the store at `config.output.store_path`
    ///
    /// Reads the whole existing store to build the dedup index, then opens it
    /// for appending (creating it with a header if needed).
    pub fn new(
        config: &Config,
        timer: T,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, TrackerError> {
        let traversal = Traversal::from_config(config, timer.clone())?;
        Self::with_traversal(
            traversal,
            Path::new(&config.output.store_path),
            config.poll_interval(),
            timer,
            shutdown,
        )
    }

    /// Creates a scheduler around an existing traversal
    pub fn with_traversal(
        traversal: Traversal<T>,
        store_path: &Path,
        interval: Duration,
        timer: T,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, TrackerError> {
        let existing = CsvStore::load_records(store_path)?;
        let index = DedupIndex::from_records(&existing);
        tracing::info!(
            "Loaded {} known trades from {}",
            index.len(),
            store_path.display()
        );

        let store = CsvStore::open(store_path, OpenMode::Append)?;

        Ok(Self {
            traversal,
            store,
            index,
            interval,
            timer,
            shutdown,
            max_cycles: None,
            cycles: 0,
        })
    }

    /// Stop after `cycles` cycles instead of running until shutdown
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    /// Number of identity keys currently known
    pub fn known_records(&self) -> usize {
        self.index.len()
    }

    /// Runs a single incremental cycle
    ///
    /// Storage failures are logged and end the cycle; they do not stop the
    /// scheduler.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycles += 1;
        let started_at = Utc::now();
        tracing::info!("Checking for new trades (cycle {})", self.cycles);

        let traversal = match self
            .traversal
            .incremental(&mut self.store, &mut self.index)
            .await
        {
            Ok(report) => {
                if report.records_appended > 0 {
                    tracing::info!("Found {} new trades!", report.records_appended);
                } else {
                    tracing::info!("No new trades at this time.");
                }
                Some(report)
            }
            Err(e) => {
                tracing::error!(
                    "Cycle {} failed writing {}: {}",
                    self.cycles,
                    self.store.path().display(),
                    e
                );
                None
            }
        };

        CycleReport {
            cycle: self.cycles,
            started_at,
            traversal,
        }
    }

    /// Runs cycles until shutdown is signalled or the cycle limit is reached
    pub async fn run(mut self) -> SchedulerSummary {
        let mut summary = SchedulerSummary::default();

        loop {
            if *self.shutdown.borrow() {
                tracing::info!("Shutdown requested, stopping monitor");
                break;
            }

            let report = self.run_cycle().await;
            summary.cycles += 1;
            summary.new_records += report.new_records();

            if let Some(max) = self.max_cycles {
                if summary.cycles >= max {
                    break;
                }
            }

            tracing::debug!("Next check in {:?}", self.interval);
            if self.wait_for_next_cycle().await {
                tracing::info!("Shutdown requested, stopping monitor");
                break;
            }
        }

        tracing::info!(
            "Monitor finished: {} cycles, {} new trades",
            summary.cycles,
            summary.new_records
        );
        summary
    }

    /// Waits one poll interval; returns true if shutdown was signalled meanwhile
    async fn wait_for_next_cycle(&mut self) -> bool {
        let sleep = self.timer.sleep(self.interval);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return false,
                changed = self.shutdown.changed() => match changed {
                    Ok(()) if *self.shutdown.borrow() => return true,
                    Ok(()) => continue,
                    Err(_) => {
                        // Sender gone: nobody can request shutdown any more.
                        sleep.await;
                        return false;
                    }
                },
            }
        }
    }
}
