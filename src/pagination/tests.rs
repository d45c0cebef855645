//! Tests for pagination module

use super::*;
use crate::classify::{ErrorCategory, ErrorClassifier, ErrorMessages, StaticConnectivity};
use crate::error::Error;
use crate::list::{ChangeRecorder, FooterState, ListChange, Row, RowKind};
use crate::types::{Item, PageResponse};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn items(titles: &[&str]) -> Vec<Item> {
    titles.iter().map(|t| Item::titled(*t)).collect()
}

fn page(n: u32, titles: &[&str], total: u32) -> PageResponse {
    PageResponse::new(n, items(titles), total)
}

fn sequencer() -> PageSequencer {
    let classifier = ErrorClassifier::new(
        Arc::new(StaticConnectivity::online()),
        ErrorMessages::default(),
    );
    PageSequencer::new(classifier, SequencerConfig::default())
}

/// Sequencer with `[A, B, C]` loaded from a 5-page resource
fn loaded() -> PageSequencer {
    let mut seq = sequencer();
    let request = seq.load_first_page().unwrap();
    seq.complete(request.complete(Ok(page(1, &["A", "B", "C"], 5))));
    seq
}

fn titles(seq: &PageSequencer) -> Vec<String> {
    seq.list()
        .rows()
        .map(|row| match row {
            Row::Header(item) => format!("H:{}", item.title),
            Row::Content(item) => item.title.clone(),
            Row::Footer(FooterState::Loading) => "F:loading".to_string(),
            Row::Footer(FooterState::Retry { message }) => format!("F:retry:{message}"),
        })
        .collect()
}

// ============================================================================
// PagerState Tests
// ============================================================================

#[test]
fn test_pager_state_default() {
    let state = PagerState::new(SequencerConfig::default());
    assert_eq!(state.current_page(), 1);
    assert!(!state.is_loading());
    assert!(!state.is_last_page());
    assert!(!state.retry_pending());
    assert!(!state.can_load_more());
    assert_eq!(state.phase(), PagerPhase::Idle);
}

#[test]
fn test_total_pages_hint_is_only_a_placeholder() {
    let config = SequencerConfig {
        start_page: 1,
        total_pages_hint: Some(1002),
    };
    let classifier = ErrorClassifier::new(
        Arc::new(StaticConnectivity::online()),
        ErrorMessages::default(),
    );
    let mut seq = PageSequencer::new(classifier, config);
    assert_eq!(seq.state().known_total_pages(), Some(1002));

    let request = seq.load_first_page().unwrap();
    seq.complete(request.complete(Ok(page(1, &["A", "B"], 2))));

    // the reported maximum replaces the hint
    assert_eq!(seq.state().known_total_pages(), Some(2));

    let request = seq.load_next_page().unwrap();
    seq.complete(request.complete(Ok(page(2, &["C"], 2))));
    assert!(seq.state().is_last_page());
}

// ============================================================================
// First Page Tests
// ============================================================================

#[test]
fn test_first_page_builds_header_content_footer() {
    let mut seq = sequencer();
    let request = seq.load_first_page().unwrap();

    assert_eq!(request.page, 1);
    assert_eq!(request.kind, FetchKind::FirstPage);
    assert_eq!(seq.state().phase(), PagerPhase::Fetching);

    let applied = seq.complete(request.complete(Ok(page(1, &["A", "B", "C"], 5))));

    assert_eq!(
        applied,
        Applied::FirstPageLoaded {
            items: 3,
            exhausted: false
        }
    );
    assert_eq!(titles(&seq), vec!["H:A", "B", "C", "F:loading"]);
    assert_eq!(seq.state().phase(), PagerPhase::Idle);
    assert!(seq.state().can_load_more());
    assert_eq!(seq.state().pages_loaded(), 1);
    assert!(seq.state().last_loaded_at().is_some());
}

#[test]
fn test_single_page_resource_is_exhausted_immediately() {
    let mut seq = sequencer();
    let request = seq.load_first_page().unwrap();
    let applied = seq.complete(request.complete(Ok(page(1, &["A", "B"], 1))));

    assert_eq!(
        applied,
        Applied::FirstPageLoaded {
            items: 2,
            exhausted: true
        }
    );
    assert_eq!(titles(&seq), vec!["H:A", "B"]);
    assert_eq!(seq.state().phase(), PagerPhase::Exhausted);
    assert!(seq.state().last_error_message().is_none());
}

#[test]
fn test_empty_resource_is_exhausted() {
    let mut seq = sequencer();
    let request = seq.load_first_page().unwrap();
    seq.complete(request.complete(Ok(page(1, &[], 0))));

    assert!(seq.list().is_empty());
    assert!(seq.state().is_last_page());
}

#[test]
fn test_first_page_only_once() {
    let mut seq = loaded();
    assert!(seq.load_first_page().is_none());
}

#[test]
fn test_first_page_failure_is_blocking() {
    let mut seq = sequencer();
    let request = seq.load_first_page().unwrap();
    let applied = seq.complete(request.complete(Err(Error::Timeout { timeout_ms: 10 })));

    assert_eq!(
        applied,
        Applied::FirstPageFailed {
            category: ErrorCategory::Timeout,
            message: "Request timed out".to_string()
        }
    );
    assert!(seq.list().is_empty());
    assert_eq!(seq.state().first_load_error(), Some("Request timed out"));
    assert!(!seq.state().retry_pending());
    assert_eq!(seq.state().phase(), PagerPhase::Failed);
    assert!(seq.load_next_page().is_none());
}

#[test]
fn test_first_page_retry_starts_over() {
    let mut seq = sequencer();
    let request = seq.load_first_page().unwrap();
    seq.complete(request.complete(Err(Error::decode("garbage"))));

    let retry = seq.load_first_page().unwrap();
    assert_eq!(retry.page, 1);
    assert_ne!(retry.ticket, request.ticket);
    assert!(seq.state().first_load_error().is_none());

    seq.complete(retry.complete(Ok(page(1, &["A", "B"], 3))));
    assert_eq!(titles(&seq), vec!["H:A", "B", "F:loading"]);
}

// ============================================================================
// Next Page Tests
// ============================================================================

#[test]
fn test_next_page_increments_before_fetch() {
    let mut seq = loaded();
    let request = seq.load_next_page().unwrap();

    assert_eq!(request.page, 2);
    assert_eq!(request.kind, FetchKind::NextPage);
    assert_eq!(seq.state().current_page(), 2);
    assert!(seq.state().is_loading());
    // loading footer stays visible while in flight
    assert_eq!(seq.list().footer(), Some(&FooterState::Loading));
}

#[test]
fn test_next_page_appends_before_footer() {
    let mut seq = loaded();
    let request = seq.load_next_page().unwrap();
    let applied = seq.complete(request.complete(Ok(page(2, &["D"], 5))));

    assert_eq!(
        applied,
        Applied::PageLoaded {
            page: 2,
            items: 1,
            exhausted: false
        }
    );
    assert_eq!(titles(&seq), vec!["H:A", "B", "C", "D", "F:loading"]);
    assert!(!seq.state().is_loading());
}

#[test]
fn test_single_flight() {
    let mut seq = loaded();
    let first = seq.load_next_page();
    assert!(first.is_some());

    for _ in 0..10 {
        assert!(seq.load_next_page().is_none());
    }
    assert_eq!(seq.state().current_page(), 2);
}

#[test]
fn test_exhaustion_on_last_reported_page() {
    let mut seq = loaded();
    for n in 2..=5 {
        let request = seq.load_next_page().unwrap();
        assert_eq!(request.page, n);
        seq.complete(request.complete(Ok(page(n, &["x"], 5))));
    }

    assert!(seq.state().is_last_page());
    assert_eq!(seq.list().row_kind_at(seq.list().len() - 1), Some(RowKind::Content));
    assert!(seq.list().footer().is_none());
    assert!(seq.load_next_page().is_none());
    assert!(seq.state().last_error_message().is_none());
}

#[test]
fn test_shrinking_total_pages_exhausts_early() {
    let mut seq = loaded();
    let request = seq.load_next_page().unwrap();
    seq.complete(request.complete(Ok(page(2, &["D"], 2))));

    assert!(seq.state().is_last_page());
    assert_eq!(seq.state().total_pages(), Some(2));
}

// ============================================================================
// Failure / Retry Tests
// ============================================================================

#[test]
fn test_next_page_failure_flips_footer_in_place() {
    let mut seq = loaded();
    let recorder = ChangeRecorder::new();
    seq.subscribe(recorder.clone());

    let request = seq.load_next_page().unwrap();
    let applied = seq.complete(request.complete(Err(Error::Timeout { timeout_ms: 10 })));

    assert_eq!(
        applied,
        Applied::PageFailed {
            page: 2,
            category: ErrorCategory::Timeout,
            message: "Request timed out".to_string()
        }
    );
    assert_eq!(titles(&seq), vec!["H:A", "B", "C", "F:retry:Request timed out"]);
    assert!(seq.state().retry_pending());
    assert!(!seq.state().is_loading());
    assert_eq!(seq.state().phase(), PagerPhase::Failed);
    assert_eq!(recorder.changes(), vec![ListChange::Changed { index: 3 }]);
}

#[test]
fn test_offline_failure_uses_connectivity_message() {
    let mut seq = sequencer();
    let request = seq.load_first_page().unwrap();
    seq.complete(request.complete(Ok(page(1, &["A", "B"], 5))));

    let request = seq.load_next_page().unwrap();
    seq.complete(
        request
            .complete(Err(Error::Timeout { timeout_ms: 10 }))
            .with_connectivity(false),
    );

    assert_eq!(
        seq.state().last_error_category(),
        Some(ErrorCategory::NoConnectivity)
    );
    assert_eq!(seq.state().last_error_message(), Some("No internet connection"));
}

#[test]
fn test_scroll_load_blocked_while_retry_pending() {
    let mut seq = loaded();
    let request = seq.load_next_page().unwrap();
    seq.complete(request.complete(Err(Error::decode("bad"))));

    assert!(seq.load_next_page().is_none());
    assert_eq!(seq.state().current_page(), 2);
}

#[test]
fn test_retry_requests_same_page() {
    let mut seq = loaded();
    let request = seq.load_next_page().unwrap();
    seq.complete(request.complete(Ok(page(2, &["D"], 5))));

    let failed = seq.load_next_page().unwrap();
    assert_eq!(failed.page, 3);
    seq.complete(failed.complete(Err(Error::Timeout { timeout_ms: 10 })));

    let recorder = ChangeRecorder::new();
    seq.subscribe(recorder.clone());
    let retry = seq.retry().unwrap();

    assert_eq!(retry.page, 3);
    assert_eq!(retry.kind, FetchKind::Retry);
    assert!(!seq.state().retry_pending());
    assert_eq!(seq.list().footer(), Some(&FooterState::Loading));
    assert_eq!(recorder.take(), vec![ListChange::Changed { index: 4 }]);

    seq.complete(retry.complete(Ok(page(3, &["E"], 5))));
    assert_eq!(titles(&seq), vec!["H:A", "B", "C", "D", "E", "F:loading"]);
    assert!(seq.state().last_error_message().is_none());
}

#[test]
fn test_retry_without_failure_is_ignored() {
    let mut seq = loaded();
    assert!(seq.retry().is_none());
}

// ============================================================================
// Suppression Tests
// ============================================================================

#[test]
fn test_completion_after_close_is_suppressed() {
    let mut seq = loaded();
    let request = seq.load_next_page().unwrap();
    seq.close();

    let applied = seq.complete(request.complete(Ok(page(2, &["D"], 5))));

    assert_eq!(applied, Applied::Suppressed(SuppressReason::SessionClosed));
    assert_eq!(titles(&seq), vec!["H:A", "B", "C", "F:loading"]);
    assert!(seq.load_next_page().is_none());
    assert!(seq.load_first_page().is_none());
}

#[test]
fn test_stale_completion_is_suppressed() {
    let mut seq = sequencer();
    let first = seq.load_first_page().unwrap();
    seq.complete(first.complete(Err(Error::decode("bad"))));
    let second = seq.load_first_page().unwrap();

    // the earlier ticket answers again
    let applied = seq.complete(first.complete(Ok(page(1, &["Z"], 5))));
    assert!(applied.is_suppressed());
    assert!(seq.list().is_empty());

    seq.complete(second.complete(Ok(page(1, &["A"], 5))));
    assert_eq!(titles(&seq), vec!["H:A", "F:loading"]);
}
