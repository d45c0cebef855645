// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Solidafy Pager
//!
//! Incremental list loading for paginated remote resources.
//!
//! A list session fetches page 1 when it starts, then asks for the next
//! page whenever the user scrolls forward to within a few rows of the end.
//! Rows are a pinned header (the first item ever loaded), content items and
//! an optional trailing footer that shows either a loading indicator or a
//! tap-to-retry message.
//!
//! ## Features
//!
//! - **Single-flight paging**: at most one fetch in flight, pages strictly sequential
//! - **Classified failures**: offline, timeout or unknown, each with its own message
//! - **Retry paths**: blocking retry for the first page, footer retry afterwards
//! - **Change notifications**: every list mutation is reported as an index range
//! - **Async fetching**: completions are applied on the controller's own task
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_pager::config::load_config;
//! use solidafy_pager::controller::Controller;
//! use solidafy_pager::ScrollDirection;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> solidafy_pager::Result<()> {
//!     let config = load_config("pager.yaml")?.with_api_key("...");
//!     let source = Arc::new(config.build_source()?);
//!     let mut controller =
//!         Controller::new(source, config.classifier(), config.controller_config());
//!
//!     controller.start();
//!     controller.settle().await;
//!
//!     let total = controller.list().len();
//!     controller.on_scroll_position_changed(total, total - 1, ScrollDirection::Forward);
//!     controller.settle().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Controller                             │
//! │  start()  on_scroll_position_changed()  on_footer_retry_tapped() │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │ Trigger  │ Sequencer │   ListModel   │ Classify  │   Source    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Forward  │ Tickets   │ Header        │ Offline   │ PageFetcher │
//! │ Near end │ Retry     │ Content       │ Timeout   │ TMDB/HTTP   │
//! │          │ Exhausted │ Footer        │ Unknown   │ Rate Limit  │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Document error variant fields before 1.0

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pager
pub mod error;

/// Common types and type aliases
pub mod types;

/// Failure classification and connectivity probes
pub mod classify;

/// Row model with change notifications
pub mod list;

/// Scroll-position trigger
pub mod trigger;

/// Pagination state machine
pub mod pagination;

/// HTTP client with timeouts and rate limiting
pub mod http;

/// Page sources
pub mod source;

/// Controller wiring trigger, sequencer and source
pub mod controller;

/// YAML configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use classify::{ErrorCategory, ErrorClassifier, ErrorMessages};
pub use config::{load_config, load_config_from_str, PagerConfig};
pub use controller::{Controller, ControllerConfig, ControllerHandle, UiEvent};
pub use list::{FooterState, ListChange, ListModel, Row, RowKind};
pub use pagination::{Applied, PageSequencer, PagerPhase, PagerState};
pub use source::{PageFetcher, TmdbSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
