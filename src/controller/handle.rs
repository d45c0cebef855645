//! Handle to a spawned controller

use super::types::{ListSnapshot, UiEvent};
use crate::error::{Error, Result};
use crate::types::ScrollDirection;
use tokio::sync::{mpsc, watch};

/// Sends UI events to a spawned controller and observes its list
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    events: mpsc::Sender<UiEvent>,
    snapshots: watch::Receiver<ListSnapshot>,
}

impl ControllerHandle {
    pub(super) fn new(
        events: mpsc::Sender<UiEvent>,
        snapshots: watch::Receiver<ListSnapshot>,
    ) -> Self {
        Self { events, snapshots }
    }

    /// Send a raw event
    pub async fn send(&self, event: UiEvent) -> Result<()> {
        self.events
            .send(event)
            .await
            .map_err(|_| Error::SessionClosed)
    }

    /// Start the session
    pub async fn start(&self) -> Result<()> {
        self.send(UiEvent::Start).await
    }

    /// Report a scroll position
    pub async fn scroll(
        &self,
        total_laid_out: usize,
        last_visible: usize,
        direction: ScrollDirection,
    ) -> Result<()> {
        self.send(UiEvent::ScrollPositionChanged {
            total_laid_out,
            last_visible,
            direction,
        })
        .await
    }

    /// Tap the retry footer
    pub async fn tap_retry(&self) -> Result<()> {
        self.send(UiEvent::FooterRetryTapped).await
    }

    /// Retry a failed first load
    pub async fn retry_first_load(&self) -> Result<()> {
        self.send(UiEvent::RetryFirstLoad).await
    }

    /// Tear the session down
    pub async fn shutdown(&self) -> Result<()> {
        self.send(UiEvent::Shutdown).await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> ListSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait until a snapshot satisfies `predicate`, returning it
    pub async fn wait_for<F>(&mut self, predicate: F) -> Result<ListSnapshot>
    where
        F: FnMut(&ListSnapshot) -> bool,
    {
        let snapshot = self
            .snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| Error::SessionClosed)?;
        Ok(snapshot.clone())
    }
}
