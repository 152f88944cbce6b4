//! Statistics over the record store
//!
//! This module provides functionality for summarizing what the store holds
//! and printing it for the `--stats` mode.

use crate::storage::{CsvStore, TradeRecord};
use crate::TrackerError;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Store statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Total number of stored records
    pub total_records: usize,

    /// Count of records per transaction type ("buy", "sell", ...)
    pub by_type: BTreeMap<String, usize>,

    /// Number of distinct politicians
    pub unique_politicians: usize,

    /// Number of distinct issuers
    pub unique_issuers: usize,
}

impl StoreStatistics {
    pub fn from_records(records: &[TradeRecord]) -> Self {
        let mut by_type = BTreeMap::new();
        let mut politicians = HashSet::new();
        let mut issuers = HashSet::new();

        for record in records {
            *by_type.entry(record.trade_type.clone()).or_insert(0) += 1;
            politicians.insert(record.politician.as_str());
            issuers.insert(record.issuer.as_str());
        }

        Self {
            total_records: records.len(),
            by_type,
            unique_politicians: politicians.len(),
            unique_issuers: issuers.len(),
        }
    }
}

/// Loads statistics for the store at `path`
pub fn load_statistics(path: &Path) -> Result<StoreStatistics, TrackerError> {
    let records = CsvStore::load_records(path)?;
    Ok(StoreStatistics::from_records(&records))
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics ===\n");

    println!("Records: {}", stats.total_records);
    println!("Politicians: {}", stats.unique_politicians);
    println!("Issuers: {}", stats.unique_issuers);

    if !stats.by_type.is_empty() {
        println!("\nBy Type:");
        for (kind, count) in &stats.by_type {
            let pct = if stats.total_records > 0 {
                (*count as f64 / stats.total_records as f64) * 100.0
            } else {
                0.0
            };
            println!("  {:<12} {:>8} ({:>5.1}%)", kind, count, pct);
        }
    }
}
