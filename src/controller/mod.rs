//! Controller module
//!
//! Composition root wiring the scroll trigger, the page sequencer and the
//! fetch collaborator together.
//!
//! # Overview
//!
//! The controller owns every piece of mutable session state. Fetches run
//! on spawned tasks and their completions come back through a channel to
//! be applied on the controller's own task, so nothing needs a lock.
//!
//! Two ways to drive it:
//! - call the inbound methods directly and await `next_completion()`
//! - `spawn()` it as an actor and talk to it through a `ControllerHandle`

mod handle;
mod types;

pub use handle::ControllerHandle;
pub use types::{
    ControllerConfig, ListSnapshot, NoopSessionObserver, SessionEvent, SessionObserver,
    SessionRecorder, UiEvent,
};

use crate::classify::{ConnectivityProbe, ErrorClassifier};
use crate::list::{ListModel, ListObserver};
use crate::pagination::{Applied, FetchCompletion, FetchRequest, PageSequencer, PagerState};
use crate::source::PageFetcher;
use crate::trigger::ScrollTrigger;
use crate::types::{Item, ScrollDirection, ScrollReport};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Capacity of the inbound UI event queue
const EVENT_QUEUE: usize = 64;

/// Incremental list-loading controller
pub struct Controller {
    sequencer: PageSequencer,
    trigger: ScrollTrigger,
    fetcher: Arc<dyn PageFetcher>,
    probe: Arc<dyn ConnectivityProbe>,
    session: Box<dyn SessionObserver>,
    started: bool,
    completions_tx: mpsc::UnboundedSender<FetchCompletion>,
    completions_rx: mpsc::UnboundedReceiver<FetchCompletion>,
    snapshots: Option<watch::Sender<ListSnapshot>>,
}

impl Controller {
    /// Create a controller
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        classifier: ErrorClassifier,
        config: ControllerConfig,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let probe = classifier.probe();
        Self {
            sequencer: PageSequencer::new(classifier, config.sequencer),
            trigger: ScrollTrigger::new(config.prefetch_threshold),
            fetcher,
            probe,
            session: Box::new(NoopSessionObserver),
            started: false,
            completions_tx,
            completions_rx,
            snapshots: None,
        }
    }

    /// Set the blocking-error surface
    #[must_use]
    pub fn with_session_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.session = Box::new(observer);
        self
    }

    /// Register a list change observer
    pub fn subscribe(&mut self, observer: impl ListObserver + 'static) {
        self.sequencer.subscribe(observer);
    }

    // ========================================================================
    // Read-only projection
    // ========================================================================

    /// The list, read-only
    pub fn list(&self) -> &ListModel {
        self.sequencer.list()
    }

    /// The pager state, read-only
    pub fn pager(&self) -> &PagerState {
        self.sequencer.state()
    }

    /// Item at a row index, for detail views
    pub fn item_at(&self, index: usize) -> Option<&Item> {
        self.sequencer.list().item_at(index)
    }

    /// Current snapshot of the list
    pub fn snapshot(&self) -> ListSnapshot {
        let state = self.sequencer.state();
        ListSnapshot {
            rows: self.sequencer.list().snapshot(),
            phase: state.phase(),
            current_page: state.current_page(),
            first_load_error: state.first_load_error().map(str::to_string),
        }
    }

    // ========================================================================
    // Inbound events
    // ========================================================================

    /// Start the session; returns whether a fetch was issued
    ///
    /// Only the first call starts anything. A failed first load is retried
    /// through `retry_first_load`.
    pub fn start(&mut self) -> bool {
        if self.started {
            debug!("session already started");
            return false;
        }
        self.started = true;
        let request = self.sequencer.load_first_page();
        self.dispatch(request)
    }

    /// Retry a failed first load from scratch
    pub fn retry_first_load(&mut self) -> bool {
        if self.sequencer.state().first_load_error().is_none() {
            debug!("no failed first load to retry");
            return false;
        }
        let request = self.sequencer.load_first_page();
        let issued = self.dispatch(request);
        if issued {
            self.session.on_first_load_recovered();
        }
        issued
    }

    /// Scroll position report from the rendering layer
    pub fn on_scroll_position_changed(
        &mut self,
        total_laid_out: usize,
        last_visible: usize,
        direction: ScrollDirection,
    ) -> bool {
        let report = ScrollReport::new(total_laid_out, last_visible, direction);
        if !self.trigger.should_fire(&report, self.sequencer.state()) {
            return false;
        }
        let request = self.sequencer.load_next_page();
        self.dispatch(request)
    }

    /// The retry footer was tapped
    pub fn on_footer_retry_tapped(&mut self) -> bool {
        let request = self.sequencer.retry();
        self.dispatch(request)
    }

    /// Apply one UI event
    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::Start => {
                self.start();
            }
            UiEvent::ScrollPositionChanged {
                total_laid_out,
                last_visible,
                direction,
            } => {
                self.on_scroll_position_changed(total_laid_out, last_visible, direction);
            }
            UiEvent::FooterRetryTapped => {
                self.on_footer_retry_tapped();
            }
            UiEvent::RetryFirstLoad => {
                self.retry_first_load();
            }
            UiEvent::Shutdown => self.shutdown(),
        }
        self.publish();
    }

    /// Tear the session down
    ///
    /// A fetch still in flight is left to finish; its completion is
    /// suppressed rather than applied.
    pub fn shutdown(&mut self) {
        info!("shutting down list session");
        self.sequencer.close();
    }

    // ========================================================================
    // Completions
    // ========================================================================

    /// Whether a fetch is awaiting its completion
    pub fn has_pending(&self) -> bool {
        self.sequencer.in_flight().is_some()
    }

    /// Wait for the in-flight fetch and apply it
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Applied> {
        if !self.has_pending() {
            return None;
        }
        let completion = self.completions_rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Apply completions until nothing is in flight
    pub async fn settle(&mut self) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Some(outcome) = self.next_completion().await {
            let suppressed = outcome.is_suppressed();
            applied.push(outcome);
            if suppressed {
                break;
            }
        }
        applied
    }

    /// Apply a completion delivered back to this controller
    pub fn apply(&mut self, completion: FetchCompletion) -> Applied {
        let applied = self.sequencer.complete(completion);
        if let Applied::FirstPageFailed { message, .. } = &applied {
            self.session.on_first_load_failed(message);
        }
        self.publish();
        applied
    }

    fn dispatch(&mut self, request: Option<FetchRequest>) -> bool {
        let Some(request) = request else {
            return false;
        };
        let fetcher = Arc::clone(&self.fetcher);
        let probe = Arc::clone(&self.probe);
        let tx = self.completions_tx.clone();
        debug!(page = request.page, kind = ?request.kind, "dispatching fetch");
        tokio::spawn(async move {
            let result = fetcher.fetch_page(request.page).await;
            // Connectivity only matters for classifying a failure.
            let connected = match &result {
                Ok(_) => true,
                Err(_) => probe.is_connected().await,
            };
            // A dropped receiver means the controller is gone.
            let _ = tx.send(request.complete(result).with_connectivity(connected));
        });
        true
    }

    fn publish(&self) {
        if let Some(tx) = &self.snapshots {
            tx.send_replace(self.snapshot());
        }
    }

    // ========================================================================
    // Actor mode
    // ========================================================================

    /// Run the controller as an actor on its own task
    pub fn spawn(mut self) -> (ControllerHandle, JoinHandle<Controller>) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE);
        let (snapshot_tx, snapshot_rx) = watch::channel(self.snapshot());
        self.snapshots = Some(snapshot_tx);

        let task = tokio::spawn(self.run(events_rx));
        (ControllerHandle::new(events_tx, snapshot_rx), task)
    }

    /// Event loop: UI events and fetch completions, one at a time
    ///
    /// Ends on `UiEvent::Shutdown` or when every sender is dropped, and
    /// hands the controller back for inspection.
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) -> Self {
        loop {
            let step = tokio::select! {
                event = events.recv() => Step::Event(event),
                Some(completion) = self.completions_rx.recv() => Step::Completion(completion),
            };
            match step {
                Step::Event(Some(UiEvent::Shutdown) | None) => {
                    self.shutdown();
                    self.publish();
                    break;
                }
                Step::Event(Some(event)) => self.handle(event),
                Step::Completion(completion) => {
                    self.apply(completion);
                }
            }
        }
        self
    }
}

/// One wake-up of the event loop
enum Step {
    Event(Option<UiEvent>),
    Completion(FetchCompletion),
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("sequencer", &self.sequencer)
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}
