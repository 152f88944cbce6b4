//! Configuration module for Disclosure-Tracker
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: every key has a built-in default.
//!
//! # Example
//!
//! ```no_run
//! use disclosure_tracker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tracker.toml")).unwrap();
//! println!("Polling every {}s", config.monitor.poll_interval_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, MonitorConfig, OutputConfig, SourceConfig, TraversalConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
