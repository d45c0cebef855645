//! Page sources
//!
//! The fetch operation consumed by the pager, plus the HTTP implementation
//! for TMDB-style listing endpoints.
//!
//! # Overview
//!
//! - `PageFetcher` - `fetch_page(n) -> PageResponse`, the only suspending call
//! - `TmdbSource` - `GET {base}/{endpoint}?page=n` over `HttpClient`
//! - `ImageUrls` - resolves poster/backdrop references into full URLs

mod images;
mod tmdb;

pub use images::ImageUrls;
pub use tmdb::TmdbSource;

use crate::error::Result;
use crate::types::{PageNumber, PageResponse};
use async_trait::async_trait;

/// The fetch collaborator
///
/// Only the page number is passed; credentials, locale and endpoint are
/// fixed configuration owned by the implementation.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page
    async fn fetch_page(&self, page: PageNumber) -> Result<PageResponse>;
}
