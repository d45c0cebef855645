//! Pagination module
//!
//! The pagination state machine behind an incrementally loaded list.
//!
//! # Overview
//!
//! `PageSequencer` owns the pager state (current page, in-flight flag,
//! last-page flag, retry flag) together with the `ListModel` it feeds.
//! It never performs I/O itself: every load operation hands back a
//! `FetchRequest`, and the caller delivers the matching `FetchCompletion`
//! once the fetch collaborator answers. This keeps every mutation on the
//! caller's single execution context.
//!
//! ```text
//! Idle ──load──▶ Fetching ──ok──▶ Idle | Exhausted
//!                    │
//!                    └──err──▶ Failed ──retry──▶ Fetching
//! ```

mod sequencer;
mod types;

pub use sequencer::PageSequencer;
pub use types::{
    Applied, FetchCompletion, FetchKind, FetchRequest, FetchTicket, PagerPhase, PagerState,
    SequencerConfig, SuppressReason,
};

#[cfg(test)]
mod tests;
