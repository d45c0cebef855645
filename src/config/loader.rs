//! YAML loading and validation

use super::types::PagerConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use url::Url;

/// Load a configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<PagerConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_config_from_str(&content)
}

/// Load a configuration from a YAML string
///
/// An empty document yields the defaults.
pub fn load_config_from_str(yaml: &str) -> Result<PagerConfig> {
    let config: PagerConfig = if yaml.trim().is_empty() {
        PagerConfig::default()
    } else {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?
    };

    validate_config(&config)?;
    Ok(config)
}

/// Validate a parsed configuration
pub fn validate_config(config: &PagerConfig) -> Result<()> {
    if config.api.base_url.is_empty() {
        return Err(Error::missing_field("api.base_url"));
    }
    Url::parse(&config.api.base_url)
        .map_err(|e| Error::invalid_value("api.base_url", e.to_string()))?;

    if config.api.endpoint.is_empty() {
        return Err(Error::missing_field("api.endpoint"));
    }

    if config.paging.start_page < 1 {
        return Err(Error::invalid_value(
            "paging.start_page",
            "must be at least 1",
        ));
    }

    if config.paging.prefetch_threshold < 1 {
        return Err(Error::invalid_value(
            "paging.prefetch_threshold",
            "must be at least 1",
        ));
    }

    if config.http.timeout_seconds == 0 {
        return Err(Error::invalid_value(
            "http.timeout_seconds",
            "must be greater than zero",
        ));
    }

    if let Some(limit) = &config.http.rate_limit {
        if limit.requests_per_second == 0 {
            return Err(Error::invalid_value(
                "http.rate_limit.requests_per_second",
                "must be greater than zero",
            ));
        }
    }

    if config.connectivity.enabled && config.connectivity.probe_address.is_empty() {
        return Err(Error::missing_field("connectivity.probe_address"));
    }

    Ok(())
}
