//! Record identity and the set of identities already persisted
//!
//! Identity is deliberately coarse: a trade is recognized by who traded what,
//! when, and in which direction. Later corrections to price, size or publish
//! date on the source do not produce a second row.

use crate::storage::TradeRecord;
use std::collections::HashSet;
use std::fmt;

/// Identity of a trade: (Politician, TradedDate, Issuer, Type)
///
/// Fields are compared separately, so this is stricter than comparing the
/// concatenated string: ("Ann", "B1 Jan") and ("AnnB", "1 Jan") stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    politician: String,
    traded_date: String,
    issuer: String,
    trade_type: String,
}

impl IdentityKey {
    /// Derives the identity key of a record
    pub fn of(record: &TradeRecord) -> Self {
        Self {
            politician: record.politician.clone(),
            traded_date: record.traded_date.clone(),
            issuer: record.issuer.clone(),
            trade_type: record.trade_type.clone(),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.politician, self.traded_date, self.issuer, self.trade_type
        )
    }
}

/// In-memory set of identity keys already present in the store
///
/// Built once from the store's full contents and only ever grows.
#[derive(Debug, Default)]
pub struct DedupIndex {
    keys: HashSet<IdentityKey>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from previously stored records
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TradeRecord>,
    {
        let keys = records.into_iter().map(IdentityKey::of).collect();
        Self { keys }
    }

    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.keys.contains(key)
    }

    /// Adds a key; returns false if it was already present
    pub fn insert(&mut self, key: IdentityKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
