//! Request duration histogram.

use std::sync::Arc;

use crate::handler::{BoxedHandler, Handler};
use crate::metrics::{SharedMetrics, UNMATCHED};
use crate::middleware::Middleware;
use crate::request::Request;

/// Times every request into `webtester_http_duration_seconds`.
///
/// The label is the matched route pattern, so `/status/200` and `/status/503`
/// share the `/status/{status_code}` series; router misses go to
/// [`UNMATCHED`]. The timer is a drop guard held across the inner call: it
/// records even when an inner stage panics or the request is aborted during
/// shutdown.
#[derive(Clone)]
pub struct RecordDuration {
    metrics: SharedMetrics,
}

impl RecordDuration {
    pub fn new(metrics: SharedMetrics) -> Self {
        Self { metrics }
    }
}

impl Middleware for RecordDuration {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let metrics = Arc::clone(&self.metrics);
        (move |req: Request| {
            let next = Arc::clone(&next);
            let timer = metrics.start_timer(req.route().unwrap_or(UNMATCHED));
            async move {
                let _timer = timer;
                next.call(req).await
            }
        })
        .into_boxed_handler()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::create_metrics;
    use crate::response::Response;

    fn routed(path: &str, route: &str) -> Request {
        let mut req = Request::test("GET", path);
        req.route = Some(route.into());
        req
    }

    #[tokio::test]
    async fn labels_by_route_pattern() {
        let metrics = create_metrics().expect("create metrics");
        let handler = RecordDuration::new(Arc::clone(&metrics))
            .wrap((|_req: Request| async { "ok" }).into_boxed_handler());

        handler.call(routed("/status/200", "/status/{status_code}")).await;
        handler.call(routed("/status/503", "/status/{status_code}")).await;
        handler.call(Request::test("GET", "/nope")).await;

        assert_eq!(metrics.observation_count("/status/{status_code}"), 2);
        assert_eq!(metrics.observation_count(UNMATCHED), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_lose_no_observations() {
        let metrics = create_metrics().expect("create metrics");
        let handler = RecordDuration::new(Arc::clone(&metrics)).wrap(
            (|_req: Request| async {
                tokio::task::yield_now().await;
                Response::text("OK")
            })
            .into_boxed_handler(),
        );

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..200 {
            let handler = Arc::clone(&handler);
            tasks.spawn(async move { handler.call(routed("/healthz", "/healthz")).await });
        }
        while let Some(res) = tasks.join_next().await {
            res.expect("task");
        }

        assert_eq!(metrics.observation_count("/healthz"), 200);
    }

    async fn explode(_req: Request) -> Response {
        panic!("responder blew up")
    }

    #[tokio::test]
    async fn records_when_inner_stage_panics() {
        let metrics = create_metrics().expect("create metrics");
        let handler = RecordDuration::new(Arc::clone(&metrics)).wrap(explode.into_boxed_handler());

        let joined = tokio::spawn(async move { handler.call(routed("/", "/")).await }).await;
        assert!(joined.is_err());
        assert_eq!(metrics.observation_count("/"), 1);
    }

    #[tokio::test]
    async fn records_when_request_is_dropped() {
        let metrics = create_metrics().expect("create metrics");
        let handler = RecordDuration::new(Arc::clone(&metrics)).wrap(
            (|_req: Request| std::future::pending::<Response>()).into_boxed_handler(),
        );

        let in_flight = handler.call(routed("/", "/"));
        assert_eq!(metrics.observation_count("/"), 0);
        drop(in_flight);

        assert_eq!(metrics.observation_count("/"), 1);
    }
}
