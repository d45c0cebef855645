//! Configuration types
//!
//! Every section has defaults, so an empty document is a valid config.

use crate::classify::{
    ConnectivityProbe, ErrorClassifier, ErrorMessages, StaticConnectivity, TcpConnectivityProbe,
};
use crate::controller::ControllerConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use crate::pagination::SequencerConfig;
use crate::source::{ImageUrls, TmdbSource};
use crate::trigger::DEFAULT_PREFETCH_THRESHOLD;
use crate::types::PageNumber;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pager configuration loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Remote listing resource
    #[serde(default)]
    pub api: ApiConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Pager settings
    #[serde(default)]
    pub paging: PagingConfig,

    /// Image base URLs
    #[serde(default)]
    pub images: ImageUrls,

    /// User-facing error messages
    #[serde(default)]
    pub messages: ErrorMessages,

    /// Connectivity probe
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
}

// ============================================================================
// API
// ============================================================================

/// Remote listing resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root, e.g. `https://api.themoviedb.org/3/`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Listing endpoint relative to the base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key sent as the `api_key` query parameter
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Locale sent as the `language` query parameter
    #[serde(default = "default_language")]
    pub language: String,

    /// Name of the page query parameter
    #[serde(default = "default_page_param")]
    pub page_param: String,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3/".to_string()
}

fn default_endpoint() -> String {
    "tv/popular".to_string()
}

fn default_language() -> String {
    "en_US".to_string()
}

fn default_page_param() -> String {
    "page".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            api_key: None,
            language: default_language(),
            page_param: default_page_param(),
        }
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Client-side rate limit; `null` disables it
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: None,
            rate_limit: default_rate_limit(),
        }
    }
}

// ============================================================================
// Paging
// ============================================================================

/// Pager settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// First page number
    #[serde(default = "default_start_page")]
    pub start_page: PageNumber,

    /// Rows from the end at which the next page is requested
    #[serde(default = "default_prefetch_threshold")]
    pub prefetch_threshold: usize,

    /// Page count to report before the first response
    #[serde(default)]
    pub total_pages_hint: Option<PageNumber>,
}

fn default_start_page() -> PageNumber {
    1
}

fn default_prefetch_threshold() -> usize {
    DEFAULT_PREFETCH_THRESHOLD
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            start_page: default_start_page(),
            prefetch_threshold: default_prefetch_threshold(),
            total_pages_hint: None,
        }
    }
}

// ============================================================================
// Connectivity
// ============================================================================

/// Connectivity probe settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// Probe the network before classifying failures; when off the
    /// device is assumed online
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// `host:port` to open a TCP connection to
    #[serde(default = "default_probe_address")]
    pub probe_address: String,

    /// Probe timeout in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_probe_address() -> String {
    "api.themoviedb.org:443".to_string()
}

fn default_probe_timeout_ms() -> u64 {
    1500
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            probe_address: default_probe_address(),
            timeout_ms: default_probe_timeout_ms(),
        }
    }
}

// ============================================================================
// Wiring
// ============================================================================

impl PagerConfig {
    /// Override the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api.api_key = Some(api_key.into());
        self
    }

    /// The API key, or an error naming the missing field
    pub fn require_api_key(&self) -> Result<&str> {
        self.api
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::missing_field("api.api_key"))
    }

    /// HTTP client settings, with credentials and locale as default query
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.api.base_url)
            .timeout(Duration::from_secs(self.http.timeout_seconds))
            .query("language", &self.api.language);

        builder = match &self.http.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(key) = &self.api.api_key {
            builder = builder.query("api_key", key);
        }
        builder.build()
    }

    /// Listing source over a fresh HTTP client
    pub fn build_source(&self) -> Result<TmdbSource> {
        let client = HttpClient::with_config(self.http_client_config())?;
        Ok(TmdbSource::new(client, &self.api.endpoint).with_page_param(&self.api.page_param))
    }

    /// Controller settings
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            sequencer: SequencerConfig {
                start_page: self.paging.start_page,
                total_pages_hint: self.paging.total_pages_hint,
            },
            prefetch_threshold: self.paging.prefetch_threshold,
        }
    }

    /// Connectivity probe
    pub fn probe(&self) -> Arc<dyn ConnectivityProbe> {
        if self.connectivity.enabled {
            Arc::new(TcpConnectivityProbe::new(
                &self.connectivity.probe_address,
                Duration::from_millis(self.connectivity.timeout_ms),
            ))
        } else {
            Arc::new(StaticConnectivity::online())
        }
    }

    /// Failure classifier with the configured probe and messages
    pub fn classifier(&self) -> ErrorClassifier {
        ErrorClassifier::new(self.probe(), self.messages.clone())
    }
}
