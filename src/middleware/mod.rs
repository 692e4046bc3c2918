//! Middleware layer.
//!
//! A middleware wraps a handler and returns a new handler. It can look at or
//! rewrite the [`Request`](crate::Request) before delegating, and look at or
//! rewrite the [`Response`](crate::Response) after the inner stage returns.
//!
//! Layers are registered in order on the [`Router`](crate::Router) and
//! composed once, at startup, into a single handler:
//!
//! ```text
//! layers [M1, M2, M3] around base H  →  M1(M2(M3(H)))
//!
//!   request  → M1 → M2 → M3 → H
//!   response ← M1 ← M2 ← M3 ← H
//! ```
//!
//! The first layer registered is the outermost one: first to see the request,
//! last to see the response. The chain wraps the route table as a whole, so
//! 404s and 400s pass through every layer just like successful responses.
//!
//! Built-in layers:
//! - [`Trace`]: per-request span and access log line
//! - [`RecordDuration`]: request latency histogram
//! - [`SetHeader`]: fixed marker header on every response
//! - [`AppendFooter`]: trailing host banner appended to every body

use std::sync::Arc;

use crate::handler::BoxedHandler;

mod footer;
mod header;
mod metrics;
mod trace;

pub use footer::AppendFooter;
pub use header::SetHeader;
pub use metrics::RecordDuration;
pub use trace::Trace;

/// A request/response interceptor.
///
/// Implementations receive the next stage of the chain and return the handler
/// that runs in its place. Most layers build the returned handler from a
/// closure through [`Handler::into_boxed_handler`](crate::Handler):
///
/// ```rust
/// use webtester::{BoxedHandler, Handler, Request, middleware::Middleware};
///
/// struct Noop;
///
/// impl Middleware for Noop {
///     fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
///         (move |req: Request| next.call(req)).into_boxed_handler()
///     }
/// }
/// ```
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

/// Ordered list of middleware layers.
#[derive(Clone, Default)]
pub struct Chain {
    layers: Vec<Arc<dyn Middleware>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `layer` as the innermost layer registered so far.
    pub fn push(&mut self, layer: impl Middleware) {
        self.layers.push(Arc::new(layer));
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Wraps `base` so that the first layer ends up outermost.
    pub fn compose(&self, base: BoxedHandler) -> BoxedHandler {
        self.layers.iter().rev().fold(base, |inner, layer| layer.wrap(inner))
    }
}
