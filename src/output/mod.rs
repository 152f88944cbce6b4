//! Output module for reporting on the record store

pub mod stats;

pub use stats::{load_statistics, print_statistics, StoreStatistics};
