//! Page sequencer
//!
//! Drives the pager state and the list model through the load, fail and
//! retry transitions.

use super::types::{
    Applied, FetchCompletion, FetchKind, FetchRequest, FetchTicket, PagerState, SequencerConfig,
    SuppressReason,
};
use crate::classify::ErrorClassifier;
use crate::error::Error;
use crate::list::{FooterState, ListModel, ListObserver};
use crate::types::{PageNumber, PageResponse};
use chrono::{DateTime, Utc};
use tracing::{debug, info, trace, warn};

/// Pagination state machine for one list session
///
/// At most one fetch is in flight at any time; `is_loading` is the only
/// guard needed because every call happens on the owner's context.
#[derive(Debug)]
pub struct PageSequencer {
    config: SequencerConfig,
    state: PagerState,
    list: ListModel,
    classifier: ErrorClassifier,
    in_flight: Option<FetchRequest>,
    next_ticket: u64,
    closed: bool,
}

impl PageSequencer {
    /// Create a sequencer with an empty list
    pub fn new(classifier: ErrorClassifier, config: SequencerConfig) -> Self {
        Self {
            config,
            state: PagerState::new(config),
            list: ListModel::new(),
            classifier,
            in_flight: None,
            next_ticket: 0,
            closed: false,
        }
    }

    /// Pager state
    pub fn state(&self) -> &PagerState {
        &self.state
    }

    /// The list fed by this sequencer
    pub fn list(&self) -> &ListModel {
        &self.list
    }

    /// Register a list observer
    pub fn subscribe(&mut self, observer: impl ListObserver + 'static) {
        self.list.subscribe(observer);
    }

    /// The fetch currently in flight
    pub fn in_flight(&self) -> Option<&FetchRequest> {
        self.in_flight.as_ref()
    }

    /// Whether the session was torn down
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // ========================================================================
    // Load operations
    // ========================================================================

    /// Start the session by requesting the first page
    ///
    /// Also used to retry a failed first load, which starts over from a
    /// clean state. Returns `None` if the first page is already loaded or
    /// a fetch is in flight.
    pub fn load_first_page(&mut self) -> Option<FetchRequest> {
        if self.closed {
            warn!("load_first_page on a closed session");
            return None;
        }
        if self.state.is_loading() {
            trace!("first page already in flight");
            return None;
        }
        if self.state.first_page_loaded() {
            debug!("first page already loaded, ignoring");
            return None;
        }

        self.state = PagerState::new(self.config);
        self.list.clear();
        info!(page = self.state.current_page(), "loading first page");
        Some(self.issue(FetchKind::FirstPage))
    }

    /// Request the page after the current one
    ///
    /// A no-op while a fetch is in flight, after exhaustion, or while a
    /// footer retry is pending (the failed page must be retried first).
    pub fn load_next_page(&mut self) -> Option<FetchRequest> {
        if self.closed {
            return None;
        }
        if !self.state.can_load_more() {
            trace!(
                loading = self.state.is_loading(),
                last_page = self.state.is_last_page(),
                retry_pending = self.state.retry_pending(),
                "load_next_page ignored"
            );
            return None;
        }

        // The page about to be requested is current while in flight.
        self.state.next_page();
        debug!(page = self.state.current_page(), "loading next page");
        Some(self.issue(FetchKind::NextPage))
    }

    /// Retry the page whose fetch failed
    ///
    /// Flips the retry footer back to loading and re-requests the same page.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        if self.closed || self.state.is_loading() {
            return None;
        }
        if !self.state.retry_pending() {
            debug!("retry without a pending failure, ignoring");
            return None;
        }

        self.state.clear_retry();
        self.list.set_footer(FooterState::Loading);
        debug!(page = self.state.current_page(), "retrying page");
        Some(self.issue(FetchKind::Retry))
    }

    /// Tear the session down; later completions are suppressed
    pub fn close(&mut self) {
        if !self.closed {
            debug!(in_flight = self.in_flight.is_some(), "closing session");
        }
        self.closed = true;
        self.state.end_fetch();
    }

    fn issue(&mut self, kind: FetchKind) -> FetchRequest {
        self.next_ticket += 1;
        let request = FetchRequest {
            ticket: FetchTicket(self.next_ticket),
            page: self.state.current_page(),
            kind,
        };
        self.state.begin_fetch();
        self.in_flight = Some(request);
        request
    }

    // ========================================================================
    // Completion
    // ========================================================================

    /// Apply the result of an issued fetch
    pub fn complete(&mut self, completion: FetchCompletion) -> Applied {
        if self.closed {
            debug!(page = completion.page, "completion after close suppressed");
            return Applied::Suppressed(SuppressReason::SessionClosed);
        }
        let request = match self.in_flight {
            Some(request) if request.ticket == completion.ticket => request,
            _ => {
                warn!(
                    ticket = completion.ticket.id(),
                    page = completion.page,
                    "completion does not match the in-flight fetch"
                );
                return Applied::Suppressed(SuppressReason::StaleTicket);
            }
        };

        self.in_flight = None;
        self.state.end_fetch();

        let connected = completion.connected;
        match (request.kind, completion.result) {
            (FetchKind::FirstPage, Ok(response)) => {
                self.apply_first_page(response, completion.fetched_at)
            }
            (FetchKind::FirstPage, Err(failure)) => self.fail_first_page(&failure, connected),
            (_, Ok(response)) => self.apply_next_page(request.page, response, completion.fetched_at),
            (_, Err(failure)) => self.fail_next_page(request.page, &failure, connected),
        }
    }

    fn apply_first_page(&mut self, response: PageResponse, at: DateTime<Utc>) -> Applied {
        self.check_echo(response.page);
        let items = response.results.len();

        self.state.mark_first_page_loaded();
        self.state.record_page(response.total_pages, at);
        self.list.replace_items(response.results);

        let exhausted = self.finish_page(response.total_pages);
        info!(
            items,
            total_pages = response.total_pages,
            exhausted,
            "first page loaded"
        );
        Applied::FirstPageLoaded { items, exhausted }
    }

    fn apply_next_page(
        &mut self,
        page: PageNumber,
        response: PageResponse,
        at: DateTime<Utc>,
    ) -> Applied {
        self.check_echo(response.page);
        let items = response.results.len();

        self.list.clear_footer();
        self.list.append_content(response.results);
        self.state.record_page(response.total_pages, at);

        let exhausted = self.finish_page(response.total_pages);
        debug!(page, items, total_pages = response.total_pages, exhausted, "page loaded");
        Applied::PageLoaded {
            page,
            items,
            exhausted,
        }
    }

    /// Mark exhaustion or show the loading footer
    fn finish_page(&mut self, reported_total: PageNumber) -> bool {
        if self.state.reached_last_page(reported_total) {
            self.state.mark_done();
            self.list.clear_footer();
            true
        } else {
            self.list.set_footer(FooterState::Loading);
            false
        }
    }

    fn fail_first_page(&mut self, failure: &Error, connected: bool) -> Applied {
        let (category, message) = self.classifier.describe(failure, connected);
        warn!(
            %category,
            transport = failure.is_transport(),
            "first page failed: {failure}"
        );
        self.state.fail_first_load(message.clone());
        Applied::FirstPageFailed { category, message }
    }

    fn fail_next_page(&mut self, page: PageNumber, failure: &Error, connected: bool) -> Applied {
        let (category, message) = self.classifier.describe(failure, connected);
        warn!(
            page,
            %category,
            transport = failure.is_transport(),
            "page failed: {failure}"
        );
        self.state.set_retry(category, message.clone());
        self.list.set_footer(FooterState::retry(message.clone()));
        Applied::PageFailed {
            page,
            category,
            message,
        }
    }

    fn check_echo(&self, echoed: PageNumber) {
        // Some resources omit the page field entirely.
        if echoed != 0 && echoed != self.state.current_page() {
            warn!(
                requested = self.state.current_page(),
                echoed, "resource answered with a different page"
            );
        }
    }
}
