//! Common types used throughout Solidafy Pager
//!
//! This module contains the wire-level records exchanged with the fetch
//! collaborator and the scroll report sent by the rendering layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

/// 1-based page number of the remote resource
pub type PageNumber = u32;

// ============================================================================
// Items
// ============================================================================

/// One content record produced by the remote resource
///
/// The pager never inspects these fields; they are carried through to the
/// rendering layer as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Display title (TV listings call it `name`)
    #[serde(default, alias = "name")]
    pub title: String,

    /// Short description
    #[serde(default)]
    pub overview: String,

    /// Poster image reference, relative to the poster image base
    #[serde(default)]
    pub poster_path: Option<String>,

    /// Backdrop image reference, used only by the header row
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl Item {
    /// Create an item with only a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the overview
    #[must_use]
    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = overview.into();
        self
    }

    /// Set the poster reference
    #[must_use]
    pub fn with_poster(mut self, path: impl Into<String>) -> Self {
        self.poster_path = Some(path.into());
        self
    }

    /// Set the backdrop reference
    #[must_use]
    pub fn with_backdrop(mut self, path: impl Into<String>) -> Self {
        self.backdrop_path = Some(path.into());
        self
    }
}

// ============================================================================
// Page Response
// ============================================================================

/// One page as returned by the remote resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Page number echoed by the resource
    #[serde(default)]
    pub page: PageNumber,

    /// Items on this page, in resource order
    #[serde(default)]
    pub results: Vec<Item>,

    /// Total number of items across all pages
    #[serde(default)]
    pub total_results: u64,

    /// Maximum page number the resource currently reports
    #[serde(default)]
    pub total_pages: PageNumber,
}

impl PageResponse {
    /// Create a response for the given page
    pub fn new(page: PageNumber, results: Vec<Item>, total_pages: PageNumber) -> Self {
        Self {
            page,
            total_results: results.len() as u64,
            results,
            total_pages,
        }
    }
}

// ============================================================================
// Scrolling
// ============================================================================

/// Direction of the most recent scroll movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    /// Moving toward the end of the list
    Forward,
    /// Moving toward the start of the list
    Backward,
    /// No movement (layout pass, programmatic jump)
    #[default]
    Idle,
}

impl ScrollDirection {
    /// Derive the direction from a vertical scroll delta
    pub fn from_delta(dy: i64) -> Self {
        match dy {
            d if d > 0 => Self::Forward,
            d if d < 0 => Self::Backward,
            _ => Self::Idle,
        }
    }

    /// Check if this is a forward scroll
    pub fn is_forward(self) -> bool {
        matches!(self, Self::Forward)
    }
}

/// Scroll position as reported by the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollReport {
    /// Total rows currently laid out
    pub total_laid_out: usize,
    /// Index of the last visible row
    pub last_visible: usize,
    /// Direction of movement
    pub direction: ScrollDirection,
}

impl ScrollReport {
    /// Create a new scroll report
    pub fn new(total_laid_out: usize, last_visible: usize, direction: ScrollDirection) -> Self {
        Self {
            total_laid_out,
            last_visible,
            direction,
        }
    }

    /// Rows remaining below the last visible one
    pub fn rows_remaining(&self) -> usize {
        self.total_laid_out
            .saturating_sub(self.last_visible.saturating_add(1))
    }
}
