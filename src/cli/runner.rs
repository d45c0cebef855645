//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, PagerConfig};
use crate::controller::Controller;
use crate::error::{Result, ResultExt};
use crate::list::{FooterState, Row};
use crate::pagination::Applied;
use crate::source::{ImageUrls, PageFetcher};
use crate::types::{PageNumber, ScrollDirection};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Options for a headless browse session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseOptions {
    /// Pages to load before stopping
    pub pages: u32,
    /// Retry failed loads
    pub retry: bool,
    /// Retries allowed per failed load
    pub max_retries: u32,
}

impl Default for BrowseOptions {
    fn default() -> Self {
        Self {
            pages: 3,
            retry: false,
            max_retries: 2,
        }
    }
}

/// Outcome of a browse session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrowseReport {
    /// Pages applied to the list
    pub pages_loaded: u32,
    /// Items received
    pub items: usize,
    /// Rows in the final list
    pub rows: usize,
    /// Last page reached
    pub current_page: PageNumber,
    /// The resource ran out of pages
    pub exhausted: bool,
    /// Retries issued
    pub retries: u32,
    /// User-facing message of the failure that ended the session
    pub error: Option<String>,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        match &self.cli.command {
            Commands::Browse {
                pages,
                retry,
                max_retries,
            } => {
                config.require_api_key()?;
                let source: Arc<dyn PageFetcher> = Arc::new(config.build_source()?);
                let options = BrowseOptions {
                    pages: *pages,
                    retry: *retry,
                    max_retries: *max_retries,
                };
                self.browse(&config, source, options).await?;
                Ok(())
            }
            Commands::Fetch { page } => {
                config.require_api_key()?;
                let source = config.build_source()?;
                self.fetch(&source, &config.images, *page)
                    .await
                    .with_context(|| format!("Failed to fetch page {page}"))
            }
            Commands::Config => {
                self.output_message(&serde_json::to_value(&config)?);
                Ok(())
            }
        }
    }

    /// Load the config file (or defaults) and apply the API key override
    pub fn load_config(&self) -> Result<PagerConfig> {
        let mut config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => PagerConfig::default(),
        };

        if let Some(key) = &self.cli.api_key {
            config = config.with_api_key(key);
        } else if config.api.api_key.is_none() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                debug!("using API key from {API_KEY_ENV}");
                config = config.with_api_key(key);
            }
        }
        Ok(config)
    }

    // ========================================================================
    // Browse
    // ========================================================================

    /// Drive a controller the way a scrolling list would
    ///
    /// After each page the list is scrolled to its last row, which requests
    /// the next page. Failures are retried through the same paths a user
    /// would take: the blocking error's retry for the first page, the
    /// footer for later pages.
    pub async fn browse(
        &self,
        config: &PagerConfig,
        source: Arc<dyn PageFetcher>,
        options: BrowseOptions,
    ) -> Result<BrowseReport> {
        let started = Instant::now();
        let mut controller =
            Controller::new(source, config.classifier(), config.controller_config());
        let mut report = BrowseReport::default();
        let mut attempts = 0;

        info!(pages = options.pages, "browsing {}", config.api.endpoint);
        controller.start();

        while let Some(applied) = controller.next_completion().await {
            let page = controller.pager().current_page();
            self.output_message(&applied_message(&applied, page));

            match applied {
                Applied::FirstPageLoaded { items, exhausted }
                | Applied::PageLoaded {
                    items, exhausted, ..
                } => {
                    attempts = 0;
                    report.pages_loaded += 1;
                    report.items += items;
                    if exhausted {
                        report.exhausted = true;
                        break;
                    }
                    if report.pages_loaded >= options.pages {
                        break;
                    }
                    scroll_to_end(&mut controller);
                }
                Applied::FirstPageFailed { message, .. } => {
                    if options.retry && attempts < options.max_retries {
                        attempts += 1;
                        report.retries += 1;
                        warn!(attempt = attempts, "retrying first page");
                        controller.retry_first_load();
                    } else {
                        report.error = Some(message);
                        break;
                    }
                }
                Applied::PageFailed { page, message, .. } => {
                    if options.retry && attempts < options.max_retries {
                        attempts += 1;
                        report.retries += 1;
                        warn!(page, attempt = attempts, "retrying page");
                        controller.on_footer_retry_tapped();
                    } else {
                        report.error = Some(message);
                        break;
                    }
                }
                Applied::Suppressed(_) => break,
            }
        }

        for (index, row) in controller.list().rows().enumerate() {
            self.output_message(&row_message(index, &row, &config.images));
        }

        report.rows = controller.list().len();
        report.current_page = controller.pager().current_page();
        controller.shutdown();

        info!(
            pages = report.pages_loaded,
            items = report.items,
            duration_ms = started.elapsed().as_millis() as u64,
            "browse finished"
        );
        self.output_message(&json!({
            "type": "SUMMARY",
            "summary": report,
        }));
        Ok(report)
    }

    // ========================================================================
    // Fetch
    // ========================================================================

    /// Fetch one page and print its items
    pub async fn fetch(
        &self,
        source: &dyn PageFetcher,
        images: &ImageUrls,
        page: PageNumber,
    ) -> Result<()> {
        let response = source.fetch_page(page).await?;
        for item in &response.results {
            self.output_message(&json!({
                "type": "ITEM",
                "page": response.page,
                "item": item,
                "poster_url": images.poster_url(item),
            }));
        }
        self.output_message(&json!({
            "type": "PAGE",
            "page": response.page,
            "items": response.results.len(),
            "total_pages": response.total_pages,
            "total_results": response.total_results,
        }));
        Ok(())
    }

    /// Output a JSON message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Report the last row as visible while moving forward
fn scroll_to_end(controller: &mut Controller) {
    let total = controller.list().len();
    let fired =
        controller.on_scroll_position_changed(total, total.saturating_sub(1), ScrollDirection::Forward);
    debug!(total, fired, "scrolled to end");
}

fn applied_message(applied: &Applied, current_page: PageNumber) -> Value {
    match applied {
        Applied::FirstPageLoaded { items, exhausted } => json!({
            "type": "PAGE",
            "page": current_page,
            "items": items,
            "exhausted": exhausted,
        }),
        Applied::PageLoaded {
            page,
            items,
            exhausted,
        } => json!({
            "type": "PAGE",
            "page": page,
            "items": items,
            "exhausted": exhausted,
        }),
        Applied::FirstPageFailed { category, message } => json!({
            "type": "ERROR",
            "blocking": true,
            "category": category,
            "message": message,
        }),
        Applied::PageFailed {
            page,
            category,
            message,
        } => json!({
            "type": "ERROR",
            "blocking": false,
            "page": page,
            "category": category,
            "message": message,
        }),
        Applied::Suppressed(reason) => json!({
            "type": "SUPPRESSED",
            "reason": reason,
        }),
    }
}

fn row_message(index: usize, row: &Row<'_>, images: &ImageUrls) -> Value {
    match row {
        Row::Header(item) | Row::Content(item) => json!({
            "type": "ROW",
            "index": index,
            "kind": row.kind(),
            "title": item.title,
            "overview": item.overview,
            "image": images.row_image(row),
        }),
        Row::Footer(FooterState::Loading) => json!({
            "type": "ROW",
            "index": index,
            "kind": row.kind(),
            "state": "loading",
        }),
        Row::Footer(FooterState::Retry { message }) => json!({
            "type": "ROW",
            "index": index,
            "kind": row.kind(),
            "state": "retry",
            "message": message,
        }),
    }
}
