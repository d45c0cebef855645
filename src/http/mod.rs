//! HTTP client module
//!
//! Thin HTTP plumbing for the fetch collaborator.
//!
//! # Features
//!
//! - **Timeouts**: per-client and per-request, surfaced as `Error::Timeout`
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Status Mapping**: non-success statuses become `Error::HttpStatus`
//!
//! The client never retries on its own: a failed page is retried only when
//! the user taps the retry footer.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
