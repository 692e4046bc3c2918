//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! The route table and the middleware chain both hold handlers of *different*
//! concrete types, so every handler is erased behind [`ErasedHandler`] and
//! shared as a [`BoxedHandler`]:
//!
//! ```text
//! async fn health(req: Request) -> Response { … }   ← responder
//!        ↓ router.route("/healthz", health)
//! health.into_boxed_handler()                       ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(health))                       ← stored as BoxedHandler
//!        ↓ middleware.wrap(boxed)                   ← BoxedHandler → BoxedHandler
//! handler.call(req)  at request time                ← one vtable dispatch per layer
//! ```
//!
//! Middleware sees exactly the same type as a route handler, which is what
//! lets the chain wrap the base handler layer by layer.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Object-safe dispatch interface shared by route handlers and middleware
/// layers.
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler.
///
/// Automatically satisfied for any function or closure with the shape:
///
/// ```text
/// Fn(Request) -> impl Future<Output = impl IntoResponse>
/// ```
///
/// The trait is sealed: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Bridges a concrete handler `F` to the [`ErasedHandler`] trait object.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
