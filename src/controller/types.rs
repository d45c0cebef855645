//! Controller types
//!
//! Inbound UI events, the blocking-error surface and list snapshots.

use crate::list::RowData;
use crate::pagination::{PagerPhase, SequencerConfig};
use crate::trigger::DEFAULT_PREFETCH_THRESHOLD;
use crate::types::{PageNumber, ScrollDirection};
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Controller settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Pager settings
    pub sequencer: SequencerConfig,
    /// Rows from the end at which the next page is requested
    pub prefetch_threshold: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            sequencer: SequencerConfig::default(),
            prefetch_threshold: DEFAULT_PREFETCH_THRESHOLD,
        }
    }
}

/// Events sent by the rendering layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Session start
    Start,
    /// Scroll position changed
    ScrollPositionChanged {
        /// Total rows laid out
        total_laid_out: usize,
        /// Index of the last visible row
        last_visible: usize,
        /// Direction of movement
        direction: ScrollDirection,
    },
    /// The retry footer was tapped
    FooterRetryTapped,
    /// The blocking error's retry button was tapped
    RetryFirstLoad,
    /// The screen is being torn down
    Shutdown,
}

/// Whole-screen error surface, distinct from the retry footer
pub trait SessionObserver: Send {
    /// The first page failed with a classified message
    fn on_first_load_failed(&self, message: &str);

    /// A retry of the first page was issued; hide the blocking error
    fn on_first_load_recovered(&self);
}

/// Session observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSessionObserver;

impl SessionObserver for NoopSessionObserver {
    fn on_first_load_failed(&self, _message: &str) {}

    fn on_first_load_recovered(&self) {}
}

/// A recorded session-surface event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// First page failed
    FirstLoadFailed {
        /// Classified message
        message: String,
    },
    /// First page retry issued
    FirstLoadRecovered,
}

/// Session observer that records events
#[derive(Debug, Clone, Default)]
pub struct SessionRecorder {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl SessionRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: SessionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl SessionObserver for SessionRecorder {
    fn on_first_load_failed(&self, message: &str) {
        self.push(SessionEvent::FirstLoadFailed {
            message: message.to_string(),
        });
    }

    fn on_first_load_recovered(&self) {
        self.push(SessionEvent::FirstLoadRecovered);
    }
}

/// Read-only projection of the list, published after every step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSnapshot {
    /// Rows in order
    pub rows: Vec<RowData>,
    /// Pager phase
    pub phase: PagerPhase,
    /// Current page
    pub current_page: PageNumber,
    /// Blocking error message, if the first load failed
    pub first_load_error: Option<String>,
}

impl Default for ListSnapshot {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            phase: PagerPhase::Idle,
            current_page: SequencerConfig::default().start_page,
            first_load_error: None,
        }
    }
}
