use crate::config::types::{Config, MonitorConfig, OutputConfig, SourceConfig, TraversalConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_traversal_config(&config.traversal)?;
    validate_monitor_config(&config.monitor)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the listing source
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if !config.start_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "start-path must begin with '/', got '{}'",
            config.start_path
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates traversal bounds
fn validate_traversal_config(config: &TraversalConfig) -> Result<(), ConfigError> {
    // A zero page delay is allowed; local mirrors don't need pacing.

    if config.incremental_page_cap < 1 {
        return Err(ConfigError::Validation(format!(
            "incremental-page-cap must be >= 1, got {}",
            config.incremental_page_cap
        )));
    }

    Ok(())
}

fn validate_monitor_config(config: &MonitorConfig) -> Result<(), ConfigError> {
    if config.poll_interval_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "poll-interval-secs must be >= 1, got {}",
            config.poll_interval_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.store_path.is_empty() {
        return Err(ConfigError::Validation(
            "store-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
