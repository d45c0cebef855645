//! Tests for the classify module

use super::*;
use crate::error::Error;
use tokio::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;

// ============================================================================
// classify() Tests
// ============================================================================

#[test_case(Error::Timeout { timeout_ms: 500 }, false => ErrorCategory::NoConnectivity ; "offline wins over timeout")]
#[test_case(Error::decode("bad json"), false => ErrorCategory::NoConnectivity ; "offline wins over decode")]
#[test_case(Error::Timeout { timeout_ms: 500 }, true => ErrorCategory::Timeout ; "timeout while online")]
#[test_case(Error::http_status(500, "oops"), true => ErrorCategory::Unknown ; "server error while online")]
#[test_case(Error::decode("bad json"), true => ErrorCategory::Unknown ; "decode error while online")]
fn test_classify(failure: Error, connected: bool) -> ErrorCategory {
    classify(&failure, connected)
}

// ============================================================================
// ErrorMessages Tests
// ============================================================================

#[test]
fn test_messages_default() {
    let messages = ErrorMessages::default();
    assert_eq!(messages.message_for(ErrorCategory::Timeout), "Request timed out");
    assert_eq!(
        messages.message_for(ErrorCategory::NoConnectivity),
        "No internet connection"
    );
    assert_eq!(messages.message_for(ErrorCategory::Unknown), "Something went wrong");
}

#[test]
fn test_messages_partial_yaml() {
    let messages: ErrorMessages = serde_yaml::from_str("timeout: too slow").unwrap();
    assert_eq!(messages.timeout, "too slow");
    assert_eq!(messages.unknown, "Something went wrong");
}

// ============================================================================
// ErrorClassifier Tests
// ============================================================================

#[test]
fn test_classifier_maps_messages() {
    let classifier = ErrorClassifier::new(
        Arc::new(StaticConnectivity::online()),
        ErrorMessages::default(),
    );
    let failure = Error::Timeout { timeout_ms: 100 };

    let (category, message) = classifier.describe(&failure, true);
    assert_eq!(category, ErrorCategory::Timeout);
    assert_eq!(message, "Request timed out");

    let (category, message) = classifier.describe(&failure, false);
    assert_eq!(category, ErrorCategory::NoConnectivity);
    assert_eq!(message, "No internet connection");
}

#[tokio::test]
async fn test_classifier_shares_connectivity_source() {
    let probe = Arc::new(StaticConnectivity::online());
    let classifier = ErrorClassifier::new(probe.clone(), ErrorMessages::default());
    assert!(classifier.probe().is_connected().await);

    probe.set_connected(false);
    assert!(!classifier.probe().is_connected().await);
}

#[test]
fn test_category_display() {
    assert_eq!(ErrorCategory::NoConnectivity.to_string(), "no_connectivity");
    assert_eq!(ErrorCategory::Timeout.to_string(), "timeout");
    assert_eq!(ErrorCategory::Unknown.to_string(), "unknown");
}

// ============================================================================
// Probe Tests
// ============================================================================

#[tokio::test]
async fn test_tcp_probe_reaches_local_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let probe = TcpConnectivityProbe::new(addr.to_string(), Duration::from_millis(500));
    assert!(probe.is_connected().await);
}

#[tokio::test]
async fn test_tcp_probe_unresolvable_address() {
    let probe = TcpConnectivityProbe::new("not an address", Duration::from_millis(50));
    assert!(!probe.is_connected().await);
}

#[tokio::test]
async fn test_tcp_check_yields_while_waiting() {
    // nothing accepts on a closed port; the timer must still fire on time
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let probe = TcpConnectivityProbe::new(addr.to_string(), Duration::from_millis(300));
    let timer = tokio::spawn(async {
        let started = tokio::time::Instant::now();
        tokio::time::sleep(Duration::from_millis(10)).await;
        started.elapsed()
    });

    assert!(!probe.is_connected().await);
    assert!(timer.await.unwrap() < Duration::from_millis(200));
}
