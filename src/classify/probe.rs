//! Connectivity probes

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::trace;

/// Side-effect-free "is the device online" query
///
/// Consulted on the fetch task after a failure, never on the task that
/// owns the list.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// Whether a network is currently reachable
    async fn is_connected(&self) -> bool;
}

/// Probe with a fixed (but switchable) answer
#[derive(Debug)]
pub struct StaticConnectivity {
    connected: AtomicBool,
}

impl StaticConnectivity {
    /// Create a probe that always reports the given state
    pub fn new(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
        }
    }

    /// Probe that reports online
    pub fn online() -> Self {
        Self::new(true)
    }

    /// Probe that reports offline
    pub fn offline() -> Self {
        Self::new(false)
    }

    /// Change the reported state
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl Default for StaticConnectivity {
    fn default() -> Self {
        Self::online()
    }
}

#[async_trait]
impl ConnectivityProbe for StaticConnectivity {
    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Probe that opens a TCP connection to a well-known address
///
/// Name resolution and the connect both run under one timeout.
#[derive(Debug, Clone)]
pub struct TcpConnectivityProbe {
    address: String,
    timeout: Duration,
}

impl TcpConnectivityProbe {
    /// Create a probe for `host:port`
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ConnectivityProbe for TcpConnectivityProbe {
    async fn is_connected(&self) -> bool {
        let attempt = tokio::time::timeout(self.timeout, TcpStream::connect(self.address.as_str()));
        let connected = match attempt.await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                trace!(address = %self.address, "connectivity probe failed: {e}");
                false
            }
            Err(_) => {
                trace!(address = %self.address, "connectivity probe timed out");
                false
            }
        };
        trace!(address = %self.address, connected, "connectivity probe");
        connected
    }
}
