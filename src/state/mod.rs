//! State tracking module
//!
//! Holds the deduplication state that persists across poll cycles.

mod dedup;

pub use dedup::{DedupIndex, IdentityKey};
