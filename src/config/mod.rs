//! Configuration module
//!
//! YAML configuration for the pager: the remote resource, HTTP transport,
//! paging, image URLs, error messages and the connectivity probe.
//!
//! # Example
//!
//! ```yaml
//! api:
//!   base_url: https://api.themoviedb.org/3/
//!   endpoint: tv/popular
//!   language: en_US
//! paging:
//!   prefetch_threshold: 5
//! messages:
//!   timeout: "Request timed out"
//! ```

mod loader;
mod types;

pub use loader::{load_config, load_config_from_str, validate_config};
pub use types::{ApiConfig, ConnectivityConfig, HttpSettings, PagerConfig, PagingConfig};
