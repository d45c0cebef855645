//! Scroll trigger
//!
//! Decides, from a scroll report and the pager state, whether the next
//! page should be requested. It keeps no memory of earlier decisions:
//! repeated fires for nearby positions are absorbed by the pager's
//! in-flight guard.

use crate::pagination::PagerState;
use crate::types::ScrollReport;
use tracing::trace;

/// Rows from the end at which the next page is requested
pub const DEFAULT_PREFETCH_THRESHOLD: usize = 5;

/// Load-more decision rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTrigger {
    threshold: usize,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_PREFETCH_THRESHOLD)
    }
}

impl ScrollTrigger {
    /// Create a trigger with the given prefetch threshold
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Prefetch threshold in rows
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Whether the last visible row is within the threshold of the end
    pub fn near_end(&self, report: &ScrollReport) -> bool {
        report.total_laid_out > 0 && report.rows_remaining() < self.threshold
    }

    /// Whether a load-more request should fire
    pub fn should_fire(&self, report: &ScrollReport, pager: &PagerState) -> bool {
        let fire = report.direction.is_forward() && self.near_end(report) && pager.can_load_more();
        trace!(
            total = report.total_laid_out,
            last_visible = report.last_visible,
            direction = ?report.direction,
            fire,
            "scroll trigger"
        );
        fire
    }
}
