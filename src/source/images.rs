//! Image reference resolution

use crate::list::Row;
use crate::types::Item;
use serde::{Deserialize, Serialize};

/// Base URLs for poster and backdrop images
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrls {
    /// Prefix for poster references (content rows)
    #[serde(default = "default_poster_base")]
    pub poster_base: String,

    /// Prefix for backdrop references (header row)
    #[serde(default = "default_backdrop_base")]
    pub backdrop_base: String,
}

fn default_poster_base() -> String {
    "https://image.tmdb.org/t/p/w300".to_string()
}

fn default_backdrop_base() -> String {
    "https://image.tmdb.org/t/p/w780".to_string()
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self {
            poster_base: default_poster_base(),
            backdrop_base: default_backdrop_base(),
        }
    }
}

impl ImageUrls {
    /// Full poster URL of an item
    pub fn poster_url(&self, item: &Item) -> Option<String> {
        item.poster_path
            .as_deref()
            .map(|path| join(&self.poster_base, path))
    }

    /// Full backdrop URL of an item
    pub fn backdrop_url(&self, item: &Item) -> Option<String> {
        item.backdrop_path
            .as_deref()
            .map(|path| join(&self.backdrop_base, path))
    }

    /// Image shown by a row: backdrop for the header, poster for content
    pub fn row_image(&self, row: &Row<'_>) -> Option<String> {
        match row {
            Row::Header(item) => self.backdrop_url(item),
            Row::Content(item) => self.poster_url(item),
            Row::Footer(_) => None,
        }
    }
}

fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
