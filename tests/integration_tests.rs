//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → TMDB-style HTTP listing →
//! controller → list rows

use clap::Parser;
use serde_json::json;
use solidafy_pager::cli::{BrowseOptions, Cli, Runner};
use solidafy_pager::config::{load_config_from_str, PagerConfig};
use solidafy_pager::controller::{Controller, SessionEvent, SessionRecorder};
use solidafy_pager::list::{ChangeRecorder, FooterState, ListChange, RowData};
use solidafy_pager::pagination::{Applied, PagerPhase};
use solidafy_pager::source::PageFetcher;
use solidafy_pager::{ErrorCategory, ScrollDirection};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn config_for(server: &MockServer) -> PagerConfig {
    let yaml = format!(
        r#"
api:
  base_url: {}
  endpoint: tv/popular
  api_key: test-key
http:
  timeout_seconds: 1
  rate_limit: null
connectivity:
  enabled: false
"#,
        server.uri()
    );
    load_config_from_str(&yaml).unwrap()
}

fn listing(page: u32, names: &[&str], total_pages: u32) -> serde_json::Value {
    let results: Vec<_> = names
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "overview": format!("About {name}"),
                "poster_path": format!("/{}.jpg", name.to_lowercase()),
                "backdrop_path": format!("/{}-bg.jpg", name.to_lowercase()),
            })
        })
        .collect();
    json!({
        "page": page,
        "results": results,
        "total_results": results.len(),
        "total_pages": total_pages,
    })
}

async fn mount_page(server: &MockServer, page: u32, names: &[&str], total_pages: u32) {
    Mock::given(method("GET"))
        .and(path("/tv/popular"))
        .and(query_param("page", page.to_string()))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(page, names, total_pages)))
        .expect(1)
        .mount(server)
        .await;
}

fn controller_for(config: &PagerConfig) -> Controller {
    let source: Arc<dyn PageFetcher> = Arc::new(config.build_source().unwrap());
    Controller::new(source, config.classifier(), config.controller_config())
}

fn titles(controller: &Controller) -> Vec<String> {
    controller
        .list()
        .snapshot()
        .into_iter()
        .map(|row| match row {
            RowData::Header(item) => format!("H:{}", item.title),
            RowData::Content(item) => item.title,
            RowData::Footer(FooterState::Loading) => "F:loading".to_string(),
            RowData::Footer(FooterState::Retry { message }) => format!("F:retry:{message}"),
        })
        .collect()
}

fn scroll_to_end(controller: &mut Controller) -> bool {
    let total = controller.list().len();
    controller.on_scroll_position_changed(total, total - 1, ScrollDirection::Forward)
}

// ============================================================================
// Full Session
// ============================================================================

#[tokio::test]
async fn test_full_session_over_http() {
    let server = MockServer::start().await;
    let config = config_for(&server);

    mount_page(&server, 1, &["A", "B", "C"], 5).await;
    mount_page(&server, 2, &["D"], 5).await;

    // page 3 times out once, then succeeds
    Mock::given(method("GET"))
        .and(path("/tv/popular"))
        .and(query_param("page", "3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(3, &["X"], 5))
                .set_delay(Duration::from_millis(1500)),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, 3, &["E"], 5).await;
    mount_page(&server, 4, &["F"], 5).await;
    mount_page(&server, 5, &["G"], 5).await;

    let mut controller = controller_for(&config);
    let changes = ChangeRecorder::new();
    controller.subscribe(changes.clone());

    // session start
    assert!(controller.start());
    controller.settle().await;
    assert_eq!(titles(&controller), vec!["H:A", "B", "C", "F:loading"]);

    // scroll near the end
    assert!(scroll_to_end(&mut controller));
    controller.settle().await;
    assert_eq!(controller.pager().current_page(), 2);
    assert_eq!(
        titles(&controller),
        vec!["H:A", "B", "C", "D", "F:loading"]
    );

    // timeout while connected
    assert!(scroll_to_end(&mut controller));
    let applied = controller.settle().await;
    assert!(matches!(
        applied.as_slice(),
        [Applied::PageFailed {
            page: 3,
            category: ErrorCategory::Timeout,
            ..
        }]
    ));
    assert_eq!(
        titles(&controller),
        vec!["H:A", "B", "C", "D", "F:retry:Request timed out"]
    );
    assert!(controller.pager().retry_pending());
    assert!(!scroll_to_end(&mut controller));

    // retry the same page
    changes.take();
    assert!(controller.on_footer_retry_tapped());
    controller.settle().await;
    assert_eq!(
        titles(&controller),
        vec!["H:A", "B", "C", "D", "E", "F:loading"]
    );
    assert!(!controller.pager().retry_pending());
    assert_eq!(
        changes.changes().first(),
        Some(&ListChange::Changed { index: 4 })
    );

    // run to the last page
    assert!(scroll_to_end(&mut controller));
    controller.settle().await;
    assert!(scroll_to_end(&mut controller));
    controller.settle().await;

    assert_eq!(controller.pager().current_page(), 5);
    assert!(controller.pager().is_last_page());
    assert_eq!(controller.pager().phase(), PagerPhase::Exhausted);
    assert_eq!(
        titles(&controller),
        vec!["H:A", "B", "C", "D", "E", "F", "G"]
    );

    // exhausted: no further fetch
    assert!(!scroll_to_end(&mut controller));

    // header uses the backdrop, content the poster
    let header = controller.item_at(0).unwrap();
    assert_eq!(
        config.images.backdrop_url(header).as_deref(),
        Some("https://image.tmdb.org/t/p/w780/a-bg.jpg")
    );
    let content = controller.item_at(1).unwrap();
    assert_eq!(
        config.images.poster_url(content).as_deref(),
        Some("https://image.tmdb.org/t/p/w300/b.jpg")
    );
}

#[tokio::test]
async fn test_first_page_server_error_is_blocking() {
    let server = MockServer::start().await;
    let config = config_for(&server);

    Mock::given(method("GET"))
        .and(path("/tv/popular"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_page(&server, 1, &["A", "B"], 1).await;

    let recorder = SessionRecorder::new();
    let mut controller = controller_for(&config).with_session_observer(recorder.clone());

    controller.start();
    controller.settle().await;
    assert!(controller.list().is_empty());
    assert_eq!(
        controller.snapshot().first_load_error.as_deref(),
        Some("Something went wrong")
    );

    assert!(controller.retry_first_load());
    controller.settle().await;

    assert_eq!(titles(&controller), vec!["H:A", "B"]);
    assert_eq!(controller.pager().phase(), PagerPhase::Exhausted);
    assert_eq!(
        recorder.events(),
        vec![
            SessionEvent::FirstLoadFailed {
                message: "Something went wrong".to_string()
            },
            SessionEvent::FirstLoadRecovered,
        ]
    );
}

#[tokio::test]
async fn test_spawned_controller_over_http() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    mount_page(&server, 1, &["A", "B", "C"], 2).await;
    mount_page(&server, 2, &["D"], 2).await;

    let (mut handle, task) = controller_for(&config).spawn();

    handle.start().await.unwrap();
    handle
        .wait_for(|s| s.rows.len() == 4 && s.phase == PagerPhase::Idle)
        .await
        .unwrap();

    handle.scroll(4, 3, ScrollDirection::Forward).await.unwrap();
    let snapshot = handle
        .wait_for(|s| s.phase == PagerPhase::Exhausted)
        .await
        .unwrap();
    assert_eq!(snapshot.rows.len(), 4);
    assert_eq!(snapshot.current_page, 2);

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

// ============================================================================
// CLI Runner
// ============================================================================

#[tokio::test]
async fn test_runner_browse_stops_after_requested_pages() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    mount_page(&server, 1, &["A", "B"], 10).await;
    mount_page(&server, 2, &["C", "D"], 10).await;

    let runner = Runner::new(Cli::parse_from(["solidafy-pager", "browse"]));
    let source: Arc<dyn PageFetcher> = Arc::new(config.build_source().unwrap());
    let report = runner
        .browse(
            &config,
            source,
            BrowseOptions {
                pages: 2,
                ..BrowseOptions::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(report.pages_loaded, 2);
    assert_eq!(report.items, 4);
    assert_eq!(report.current_page, 2);
    assert_eq!(report.rows, 5);
    assert!(!report.exhausted);
    assert!(report.error.is_none());
}

#[tokio::test]
async fn test_runner_browse_retries_failed_page() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    mount_page(&server, 1, &["A"], 2).await;
    Mock::given(method("GET"))
        .and(path("/tv/popular"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_page(&server, 2, &["B"], 2).await;

    let runner = Runner::new(Cli::parse_from(["solidafy-pager", "browse"]));
    let source: Arc<dyn PageFetcher> = Arc::new(config.build_source().unwrap());
    let report = runner
        .browse(
            &config,
            source,
            BrowseOptions {
                pages: 5,
                retry: true,
                max_retries: 1,
            },
        )
        .await
        .unwrap();

    assert_eq!(report.pages_loaded, 2);
    assert_eq!(report.retries, 1);
    assert!(report.exhausted);
    assert!(report.error.is_none());
}

#[tokio::test]
async fn test_runner_browse_reports_blocking_error() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    Mock::given(method("GET"))
        .and(path("/tv/popular"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let runner = Runner::new(Cli::parse_from(["solidafy-pager", "browse"]));
    let source: Arc<dyn PageFetcher> = Arc::new(config.build_source().unwrap());
    let report = runner
        .browse(&config, source, BrowseOptions::default())
        .await
        .unwrap();

    assert_eq!(report.pages_loaded, 0);
    assert_eq!(report.error.as_deref(), Some("Something went wrong"));
    assert_eq!(report.rows, 0);
}
