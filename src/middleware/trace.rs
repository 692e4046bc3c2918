//! Access logging.

use std::sync::Arc;
use std::time::Instant;

use tracing::{Instrument, info, info_span};

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::request::Request;

/// Opens a `request` span per request and logs one line when the response is
/// ready: method, path, status and latency.
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl Middleware for Trace {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        (move |req: Request| {
            let next = Arc::clone(&next);
            let span = info_span!("request", method = %req.method(), path = %req.path());
            async move {
                let start = Instant::now();
                let res = next.call(req).await;
                info!(
                    status = res.status_code(),
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "request completed"
                );
                res
            }
            .instrument(span)
        })
        .into_boxed_handler()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    #[tokio::test]
    async fn passes_response_through() {
        let handler = Trace.wrap((|_req: Request| async { Status::IM_A_TEAPOT }).into_boxed_handler());
        let res = handler.call(Request::test("DELETE", "/status/418")).await;
        assert_eq!(res.status_code(), 418);
        assert!(res.body().is_empty());
    }
}
