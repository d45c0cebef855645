//! Row, footer and change-notification types

use crate::types::Item;
use serde::Serialize;
use std::ops::Range;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Kind of a row, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// First loaded item, rendered with the backdrop image
    Header,
    /// Regular content item
    Content,
    /// Synthetic trailing row
    Footer,
}

/// State of the trailing footer row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FooterState {
    /// A page is being fetched (or more pages are believed to remain)
    Loading,
    /// The last fetch failed; tapping the row retries it
    Retry {
        /// Classified, user-facing message
        message: String,
    },
}

impl FooterState {
    /// Create a retry footer
    pub fn retry(message: impl Into<String>) -> Self {
        Self::Retry {
            message: message.into(),
        }
    }

    /// Check if this is the loading footer
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Check if this is the retry footer
    pub fn is_retry(&self) -> bool {
        matches!(self, Self::Retry { .. })
    }

    /// Message carried by a retry footer
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Retry { message } => Some(message),
            Self::Loading => None,
        }
    }
}

/// A row borrowed from the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "row", rename_all = "snake_case")]
pub enum Row<'a> {
    /// Header row
    Header(&'a Item),
    /// Content row
    Content(&'a Item),
    /// Footer row
    Footer(&'a FooterState),
}

impl<'a> Row<'a> {
    /// Kind of this row
    pub fn kind(&self) -> RowKind {
        match self {
            Self::Header(_) => RowKind::Header,
            Self::Content(_) => RowKind::Content,
            Self::Footer(_) => RowKind::Footer,
        }
    }

    /// Item behind a header or content row
    pub fn item(&self) -> Option<&'a Item> {
        match *self {
            Self::Header(item) | Self::Content(item) => Some(item),
            Self::Footer(_) => None,
        }
    }

    /// Owned copy of this row
    pub fn to_data(&self) -> RowData {
        match *self {
            Self::Header(item) => RowData::Header(item.clone()),
            Self::Content(item) => RowData::Content(item.clone()),
            Self::Footer(footer) => RowData::Footer(footer.clone()),
        }
    }
}

/// An owned row, for snapshots handed across task boundaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "row", rename_all = "snake_case")]
pub enum RowData {
    /// Header row
    Header(Item),
    /// Content row
    Content(Item),
    /// Footer row
    Footer(FooterState),
}

impl RowData {
    /// Kind of this row
    pub fn kind(&self) -> RowKind {
        match self {
            Self::Header(_) => RowKind::Header,
            Self::Content(_) => RowKind::Content,
            Self::Footer(_) => RowKind::Footer,
        }
    }
}

/// A mutation of the row sequence, keyed by index range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ListChange {
    /// `count` rows inserted starting at `start`
    Inserted {
        /// First inserted index
        start: usize,
        /// Number of rows inserted
        count: usize,
    },
    /// `count` rows removed starting at `start`
    Removed {
        /// First removed index
        start: usize,
        /// Number of rows removed
        count: usize,
    },
    /// The row at `index` changed presentation in place
    Changed {
        /// Changed index
        index: usize,
    },
}

impl ListChange {
    /// Index range touched by this change
    pub fn range(&self) -> Range<usize> {
        match *self {
            Self::Inserted { start, count } | Self::Removed { start, count } => {
                start..start + count
            }
            Self::Changed { index } => index..index + 1,
        }
    }
}

/// Receives list mutations synchronously, in order
pub trait ListObserver: Send {
    /// Called after every mutation
    fn on_change(&self, change: &ListChange);
}

impl<F> ListObserver for F
where
    F: Fn(&ListChange) + Send,
{
    fn on_change(&self, change: &ListChange) {
        self(change);
    }
}

/// Observer that records every change (useful in tests and headless runs)
#[derive(Debug, Clone, Default)]
pub struct ChangeRecorder {
    changes: Arc<Mutex<Vec<ListChange>>>,
}

impl ChangeRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded changes
    pub fn changes(&self) -> Vec<ListChange> {
        self.changes
            .lock()
            .map(|changes| changes.clone())
            .unwrap_or_default()
    }

    /// Drain the recorded changes
    pub fn take(&self) -> Vec<ListChange> {
        self.changes
            .lock()
            .map(|mut changes| std::mem::take(&mut *changes))
            .unwrap_or_default()
    }
}

impl ListObserver for ChangeRecorder {
    fn on_change(&self, change: &ListChange) {
        if let Ok(mut changes) = self.changes.lock() {
            changes.push(*change);
        }
    }
}

/// Observer that forwards changes into a channel
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<ListChange>,
}

impl ListObserver for ChannelObserver {
    fn on_change(&self, change: &ListChange) {
        // Receiver gone means the rendering layer detached.
        let _ = self.tx.send(*change);
    }
}

/// Create a change-notification stream for the rendering layer
pub fn change_channel() -> (ChannelObserver, mpsc::UnboundedReceiver<ListChange>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelObserver { tx }, rx)
}
