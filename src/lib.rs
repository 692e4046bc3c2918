//! # webtester
//!
//! A tiny HTTP service for checking that traffic reaches the instance you
//! think it reaches: load balancers, ingress rules, health checks, canaries.
//!
//! Every response says which host served it, `/status/{code}` answers with
//! whatever status you ask for, and every request is timed into a Prometheus
//! histogram.
//!
//! ## Pieces
//!
//! - Radix-tree routing on [`matchit`], method-agnostic
//! - An explicit middleware chain composed once at startup ([`middleware`])
//! - Async I/O on tokio + hyper, HTTP/1.1 and HTTP/2
//! - Graceful shutdown: SIGTERM / Ctrl-C, bounded drain of in-flight requests
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use webtester::{Host, Server, metrics, routes};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), webtester::Error> {
//!     let metrics = metrics::create_metrics()?;
//!     let host = Arc::new(Host::detect("hello"));
//!     let app = routes::app(host, metrics, false);
//!
//!     Server::bind(([0, 0, 0, 0], 5117).into()).await?.serve(app).await
//! }
//! ```

mod error;
mod handler;
mod host;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod metrics;
pub mod middleware;
pub mod routes;

pub use config::Config;
pub use error::Error;
pub use handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler};
pub use host::Host;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::{Dispatcher, Router};
pub use server::{DEFAULT_GRACE_PERIOD, Server, State};
pub use status::Status;
