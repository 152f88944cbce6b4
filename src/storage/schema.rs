//! Store schema
//!
//! The header row is fixed; a store whose header differs is rejected rather
//! than migrated.

/// Column names, in on-disk order
pub const HEADER: [&str; 9] = [
    "Politician",
    "Issuer",
    "PublishedDate",
    "TradedDate",
    "DaysAfter",
    "Owner",
    "Type",
    "SizeRange",
    "Price",
];

/// Returns true if `found` is exactly the store header
pub fn header_matches<S: AsRef<str>>(found: &[S]) -> bool {
    found.len() == HEADER.len()
        && found
            .iter()
            .zip(HEADER.iter())
            .all(|(a, b)| a.as_ref() == *b)
}
