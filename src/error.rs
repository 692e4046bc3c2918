//! Unified error type.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// The error type returned by webtester's fallible operations.
///
/// Application-level errors (404, 400) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures: binding the port, accepting connections, draining
/// on shutdown and building the metrics registry.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// In-flight connections were still running when the grace period ran out.
    #[error("shutdown failed: {in_flight} connection(s) still running after {grace:?}")]
    DrainTimeout { grace: Duration, in_flight: usize },

    #[error("metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}
