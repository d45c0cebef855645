//! Error category rules and message mapping

use super::probe::ConnectivityProbe;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// User-facing category of a fetch failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The device has no active network
    NoConnectivity,
    /// The request timed out
    Timeout,
    /// Anything else
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoConnectivity => "no_connectivity",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Classify a failure
///
/// Priority order: no connectivity, then timeout, then unknown.
pub fn classify(failure: &Error, is_connected: bool) -> ErrorCategory {
    if !is_connected {
        ErrorCategory::NoConnectivity
    } else if failure.is_timeout() {
        ErrorCategory::Timeout
    } else {
        ErrorCategory::Unknown
    }
}

/// One message per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessages {
    /// Shown when the device is offline
    #[serde(default = "default_no_connectivity")]
    pub no_connectivity: String,

    /// Shown when the request timed out
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Shown for every other failure
    #[serde(default = "default_unknown")]
    pub unknown: String,
}

fn default_no_connectivity() -> String {
    "No internet connection".to_string()
}

fn default_timeout() -> String {
    "Request timed out".to_string()
}

fn default_unknown() -> String {
    "Something went wrong".to_string()
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            no_connectivity: default_no_connectivity(),
            timeout: default_timeout(),
            unknown: default_unknown(),
        }
    }
}

impl ErrorMessages {
    /// Message for a category
    pub fn message_for(&self, category: ErrorCategory) -> &str {
        match category {
            ErrorCategory::NoConnectivity => &self.no_connectivity,
            ErrorCategory::Timeout => &self.timeout,
            ErrorCategory::Unknown => &self.unknown,
        }
    }
}

/// Classifier bound to a connectivity probe and a message table
#[derive(Clone)]
pub struct ErrorClassifier {
    probe: Arc<dyn ConnectivityProbe>,
    messages: ErrorMessages,
}

impl ErrorClassifier {
    /// Create a classifier
    pub fn new(probe: Arc<dyn ConnectivityProbe>, messages: ErrorMessages) -> Self {
        Self { probe, messages }
    }

    /// Classify a failure given the connectivity observed after it
    pub fn category(&self, failure: &Error, connected: bool) -> ErrorCategory {
        let category = classify(failure, connected);
        debug!(%category, connected, "classified failure: {failure}");
        category
    }

    /// Classify a failure and return its category with the configured message
    pub fn describe(&self, failure: &Error, connected: bool) -> (ErrorCategory, String) {
        let category = self.category(failure, connected);
        (category, self.messages.message_for(category).to_string())
    }

    /// The connectivity probe, for the task that performs the fetch
    pub fn probe(&self) -> Arc<dyn ConnectivityProbe> {
        Arc::clone(&self.probe)
    }

    /// The message table
    pub fn messages(&self) -> &ErrorMessages {
        &self.messages
    }
}

impl fmt::Debug for ErrorClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorClassifier")
            .field("messages", &self.messages)
            .finish_non_exhaustive()
    }
}
