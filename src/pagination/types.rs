//! Pagination types
//!
//! Pager state, fetch tickets and completion outcomes.

use crate::classify::ErrorCategory;
use crate::error::Result;
use crate::types::{PageNumber, PageResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Coarse state of the pager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PagerPhase {
    /// Nothing in flight, more pages may follow
    Idle,
    /// A fetch is in flight
    Fetching,
    /// The last fetch failed and awaits a user retry
    Failed,
    /// Terminal: no further fetch is issued
    Exhausted,
}

/// Sequencer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerConfig {
    /// First page number (1 for most resources)
    pub start_page: PageNumber,
    /// Placeholder page count known before the first response
    pub total_pages_hint: Option<PageNumber>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            start_page: 1,
            total_pages_hint: None,
        }
    }
}

/// Tracks pagination state for one list session
#[derive(Debug, Clone, Serialize)]
pub struct PagerState {
    current_page: PageNumber,
    is_loading: bool,
    is_last_page: bool,
    retry_pending: bool,
    last_error_message: Option<String>,
    last_error_category: Option<ErrorCategory>,
    first_load_error: Option<String>,
    first_page_loaded: bool,
    total_pages: Option<PageNumber>,
    total_pages_hint: Option<PageNumber>,
    pages_loaded: u32,
    last_loaded_at: Option<DateTime<Utc>>,
}

impl PagerState {
    /// Create state positioned at the start page
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            current_page: config.start_page,
            is_loading: false,
            is_last_page: false,
            retry_pending: false,
            last_error_message: None,
            last_error_category: None,
            first_load_error: None,
            first_page_loaded: false,
            total_pages: None,
            total_pages_hint: config.total_pages_hint,
            pages_loaded: 0,
            last_loaded_at: None,
        }
    }

    /// Page requested most recently (the in-flight page while loading)
    pub fn current_page(&self) -> PageNumber {
        self.current_page
    }

    /// Whether a fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether the resource has no further pages
    pub fn is_last_page(&self) -> bool {
        self.is_last_page
    }

    /// Whether a footer retry is awaited
    pub fn retry_pending(&self) -> bool {
        self.retry_pending
    }

    /// Message of the pending footer retry
    pub fn last_error_message(&self) -> Option<&str> {
        self.last_error_message.as_deref()
    }

    /// Category of the pending footer retry
    pub fn last_error_category(&self) -> Option<ErrorCategory> {
        self.last_error_category
    }

    /// Message of a failed first load
    pub fn first_load_error(&self) -> Option<&str> {
        self.first_load_error.as_deref()
    }

    /// Whether the first page has been applied
    pub fn first_page_loaded(&self) -> bool {
        self.first_page_loaded
    }

    /// Maximum page count most recently reported by the resource
    pub fn total_pages(&self) -> Option<PageNumber> {
        self.total_pages
    }

    /// Best known page count: the reported one, else the configured hint
    pub fn known_total_pages(&self) -> Option<PageNumber> {
        self.total_pages.or(self.total_pages_hint)
    }

    /// Number of pages applied in this session
    pub fn pages_loaded(&self) -> u32 {
        self.pages_loaded
    }

    /// Completion time of the last applied page
    pub fn last_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.last_loaded_at
    }

    /// Whether a scroll-initiated load may be issued
    pub fn can_load_more(&self) -> bool {
        self.first_page_loaded && !self.is_loading && !self.is_last_page && !self.retry_pending
    }

    /// Derived phase
    pub fn phase(&self) -> PagerPhase {
        if self.is_last_page {
            PagerPhase::Exhausted
        } else if self.is_loading {
            PagerPhase::Fetching
        } else if self.retry_pending || self.first_load_error.is_some() {
            PagerPhase::Failed
        } else {
            PagerPhase::Idle
        }
    }

    // ========================================================================
    // Mutations (sequencer only)
    // ========================================================================

    pub(crate) fn begin_fetch(&mut self) {
        self.is_loading = true;
    }

    pub(crate) fn end_fetch(&mut self) {
        self.is_loading = false;
    }

    pub(crate) fn next_page(&mut self) {
        self.current_page += 1;
    }

    pub(crate) fn mark_done(&mut self) {
        self.is_last_page = true;
    }

    pub(crate) fn record_page(&mut self, total_pages: PageNumber, loaded_at: DateTime<Utc>) {
        self.total_pages = Some(total_pages);
        self.pages_loaded += 1;
        self.last_loaded_at = Some(loaded_at);
    }

    pub(crate) fn mark_first_page_loaded(&mut self) {
        self.first_page_loaded = true;
        self.first_load_error = None;
    }

    pub(crate) fn fail_first_load(&mut self, message: String) {
        self.first_load_error = Some(message);
    }

    pub(crate) fn set_retry(&mut self, category: ErrorCategory, message: String) {
        self.retry_pending = true;
        self.last_error_category = Some(category);
        self.last_error_message = Some(message);
    }

    pub(crate) fn clear_retry(&mut self) {
        self.retry_pending = false;
        self.last_error_category = None;
        self.last_error_message = None;
    }

    /// Whether the current page is at (or past) the resource-reported maximum
    pub(crate) fn reached_last_page(&self, reported_total: PageNumber) -> bool {
        self.current_page >= reported_total
    }
}

/// Identifies one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket(pub(crate) u64);

impl FetchTicket {
    /// Raw ticket number
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Why a fetch was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    /// Session start (or a retry of a failed session start)
    FirstPage,
    /// Scroll-initiated load of the next page
    NextPage,
    /// Footer retry of the page that failed
    Retry,
}

/// A fetch the caller must perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Ticket to hand back with the completion
    pub ticket: FetchTicket,
    /// Page to fetch
    pub page: PageNumber,
    /// Why it was issued
    pub kind: FetchKind,
}

impl FetchRequest {
    /// Wrap the fetch result into a completion for this request
    pub fn complete(&self, result: Result<PageResponse>) -> FetchCompletion {
        FetchCompletion {
            ticket: self.ticket,
            page: self.page,
            result,
            connected: true,
            fetched_at: Utc::now(),
        }
    }
}

/// Result of a fetch, delivered back to the sequencer
#[derive(Debug)]
pub struct FetchCompletion {
    /// Ticket of the originating request
    pub ticket: FetchTicket,
    /// Page that was fetched
    pub page: PageNumber,
    /// Fetch outcome
    pub result: Result<PageResponse>,
    /// Connectivity observed after a failure (always true on success)
    pub connected: bool,
    /// When the fetch finished
    pub fetched_at: DateTime<Utc>,
}

impl FetchCompletion {
    /// Record the connectivity observed after the fetch
    #[must_use]
    pub fn with_connectivity(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }
}

/// Why a completion was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    /// The session was torn down
    SessionClosed,
    /// The completion does not match the in-flight fetch
    StaleTicket,
}

/// What applying a completion did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// First page replaced the list
    FirstPageLoaded {
        /// Items received
        items: usize,
        /// Whether the list is already exhausted
        exhausted: bool,
    },
    /// A later page was appended
    PageLoaded {
        /// Page number
        page: PageNumber,
        /// Items received
        items: usize,
        /// Whether this was the last page
        exhausted: bool,
    },
    /// The first page failed; show the blocking error
    FirstPageFailed {
        /// Error category
        category: ErrorCategory,
        /// User-facing message
        message: String,
    },
    /// A later page failed; the footer now offers a retry
    PageFailed {
        /// Page number that failed
        page: PageNumber,
        /// Error category
        category: ErrorCategory,
        /// User-facing message
        message: String,
    },
    /// Nothing was applied
    Suppressed(SuppressReason),
}

impl Applied {
    /// Check if the completion was dropped
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppressed(_))
    }
}
