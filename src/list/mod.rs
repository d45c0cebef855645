//! List model
//!
//! The ordered row sequence handed to the rendering layer: a pinned header
//! row, the content rows in arrival order, and at most one trailing footer
//! row that reports load-more progress or a retryable failure.
//!
//! # Overview
//!
//! - `ListModel` - owns the rows and notifies observers of every mutation
//! - `Row` / `RowKind` - closed row variant, dispatched by pattern matching
//! - `FooterState` - loading or retry (with the classified message)
//! - `ListChange` - index-range change notifications

mod model;
mod types;

pub use model::ListModel;
pub use types::{
    change_channel, ChangeRecorder, ChannelObserver, FooterState, ListChange, ListObserver, Row,
    RowData, RowKind,
};
