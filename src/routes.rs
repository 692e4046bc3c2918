//! The webtester endpoints.
//!
//! | Path | Response |
//! |---|---|
//! | `/` | hostname and configured text; 404 for any other path |
//! | `/healthz` | `OK` |
//! | `/metrics` | Prometheus text format |
//! | `/versionz` | build version |
//! | `/status/{status_code}` | that status with its reason phrase, or 400 |

use std::sync::Arc;

use tracing::error;

use crate::handler::Handler;
use crate::host::Host;
use crate::metrics::SharedMetrics;
use crate::middleware::{AppendFooter, RecordDuration, SetHeader, Trace};
use crate::request::Request;
use crate::response::Response;
use crate::router::{Router, not_found};
use crate::status::Status;

/// Marker header set on every response.
pub const MARKER_HEADER: &str = "x-served-by";
pub const MARKER_VALUE: &str = "webtester";

/// Build version, from `WEBTESTER_VERSION` at compile time.
pub const VERSION: &str = match option_env!("WEBTESTER_VERSION") {
    Some(version) => version,
    None => "unset",
};

/// Assembles the route table and middleware chain.
///
/// Layer order, outermost first: access log, duration histogram, marker
/// header, then the optional footer injection.
pub fn app(host: Arc<Host>, metrics: SharedMetrics, inject_footer: bool) -> Router {
    let router = Router::new()
        .route("/", index(Arc::clone(&host)))
        .route("/healthz", health)
        .route("/metrics", metrics_handler(Arc::clone(&metrics)))
        .route("/versionz", version)
        .route("/status/{status_code}", status)
        .layer(Trace)
        .layer(RecordDuration::new(metrics))
        .layer(SetHeader::new(MARKER_HEADER, MARKER_VALUE));

    if inject_footer {
        router.layer(AppendFooter::new(host))
    } else {
        router
    }
}

pub async fn health(_req: Request) -> Response {
    Response::text("OK")
}

pub async fn version(_req: Request) -> Response {
    Response::text(VERSION)
}

/// `/` handler for `host`. Only the exact root path is served.
pub fn index(host: Arc<Host>) -> impl Handler {
    move |req: Request| {
        let res = index_response(&host, req.path());
        async move { res }
    }
}

pub fn index_response(host: &Host, path: &str) -> Response {
    if path != "/" {
        return not_found();
    }
    Response::text(host.banner())
}

pub async fn status(req: Request) -> Response {
    status_response(req.param("status_code").unwrap_or_default())
}

/// Echoes `raw` as a status code when it is a decimal integer with a
/// canonical reason phrase; 400 otherwise.
///
/// Informational (1xx) codes are rejected with 400 as well: they cannot be
/// the final response of an exchange, and hyper would replace them on the
/// wire.
pub fn status_response(raw: &str) -> Response {
    match raw.parse::<u16>().ok().and_then(Status::from_code) {
        Some(status) if status.is_informational() => Response::builder()
            .status(Status::BAD_REQUEST)
            .text(format!("informational status code cannot be a final response: {raw}")),
        Some(status) => Response::builder().status(status).text(status.canonical_text()),
        None => Response::builder()
            .status(Status::BAD_REQUEST)
            .text(format!("invalid status code: {raw}")),
    }
}

fn metrics_handler(metrics: SharedMetrics) -> impl Handler {
    move |_req: Request| {
        let metrics = Arc::clone(&metrics);
        async move {
            match metrics.encode() {
                Ok(body) => Response::builder().bytes(metrics.content_type(), body.into_bytes()),
                Err(e) => {
                    error!(error = %e, "failed to encode metrics");
                    Response::status(Status::INTERNAL_SERVER_ERROR)
                }
            }
        }
    }
}
