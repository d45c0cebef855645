//! Failure classification
//!
//! Maps a fetch failure plus the current connectivity into one of a small
//! set of user-facing categories. The raw failure is never shown to the
//! rendering layer; only the category's configured message is.
//!
//! # Overview
//!
//! - `ErrorCategory` - NoConnectivity, Timeout, Unknown
//! - `classify` - the priority rule (connectivity first, then timeout)
//! - `ErrorClassifier` - classifier bound to a connectivity probe and messages
//! - `ConnectivityProbe` - async "is the device online" query, run after a
//!   failed fetch on the fetch task

mod classifier;
mod probe;

pub use classifier::{classify, ErrorCategory, ErrorClassifier, ErrorMessages};
pub use probe::{ConnectivityProbe, StaticConnectivity, TcpConnectivityProbe};

#[cfg(test)]
mod tests;
