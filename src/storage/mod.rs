//! Storage module for persisting trade records
//!
//! This module handles:
//! - The record type and its fixed 9-column schema
//! - The append-only CSV store used as the durable sink
//! - Reading the whole store back to seed deduplication

mod csv_store;
mod schema;
mod traits;

pub use csv_store::{CsvStore, OpenMode};
pub use schema::{header_matches, HEADER};
pub use traits::{RecordSink, StorageError, StorageResult};

use serde::{Deserialize, Serialize};

/// One disclosed transaction, as listed on the trades page
///
/// Every field is kept as the source renders it; only `trade_type` is
/// normalized (lowercased). Field order matches [`HEADER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TradeRecord {
    pub politician: String,
    pub issuer: String,
    pub published_date: String,
    pub traded_date: String,
    pub days_after: String,
    pub owner: String,
    #[serde(rename = "Type")]
    pub trade_type: String,
    pub size_range: String,
    pub price: String,
}

impl TradeRecord {
    /// Builds a record from the nine cell texts of a table row, in column order
    ///
    /// Returns None unless exactly nine values are supplied.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Option<Self> {
        let [politician, issuer, published_date, traded_date, days_after, owner, trade_type, size_range, price] =
            cells
        else {
            return None;
        };

        Some(Self {
            politician: politician.as_ref().to_string(),
            issuer: issuer.as_ref().to_string(),
            published_date: published_date.as_ref().to_string(),
            traded_date: traded_date.as_ref().to_string(),
            days_after: days_after.as_ref().to_string(),
            owner: owner.as_ref().to_string(),
            trade_type: trade_type.as_ref().to_lowercase(),
            size_range: size_range.as_ref().to_string(),
            price: price.as_ref().to_string(),
        })
    }
}
