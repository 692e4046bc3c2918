//! Response body injection.

use std::sync::Arc;

use crate::handler::{BoxedHandler, Handler};
use crate::host::Host;
use crate::middleware::Middleware;
use crate::request::Request;

/// Appends `"\n{hostname}\n{text}"` to every response body once the inner
/// stages are done. Status and headers are left as the inner stages set them.
#[derive(Clone, Debug)]
pub struct AppendFooter {
    footer: Arc<[u8]>,
}

impl AppendFooter {
    pub fn new(host: Arc<Host>) -> Self {
        let footer = format!("\n{}", host.banner());
        Self { footer: footer.into_bytes().into() }
    }
}

impl Middleware for AppendFooter {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let footer = Arc::clone(&self.footer);
        (move |req: Request| {
            let next = Arc::clone(&next);
            let footer = Arc::clone(&footer);
            async move {
                let mut res = next.call(req).await;
                res.append_body(&footer);
                res
            }
        })
        .into_boxed_handler()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Response;
    use crate::status::Status;

    fn footer() -> AppendFooter {
        AppendFooter::new(Arc::new(Host::new("h1", "green")))
    }

    #[tokio::test]
    async fn appends_after_existing_body() {
        let handler = footer().wrap((|_req: Request| async { "OK" }).into_boxed_handler());
        let res = handler.call(Request::test("GET", "/healthz")).await;
        assert_eq!(res.body(), b"OK\nh1\ngreen");
    }

    #[tokio::test]
    async fn keeps_status_and_headers() {
        let handler = footer().wrap(
            (|_req: Request| async {
                Response::builder()
                    .status(Status::SERVICE_UNAVAILABLE)
                    .header("retry-after", "5")
                    .text("down")
            })
            .into_boxed_handler(),
        );

        let res = handler.call(Request::test("GET", "/")).await;
        assert_eq!(res.status_code(), 503);
        assert_eq!(res.header("retry-after"), Some("5"));
        assert_eq!(res.body(), b"down\nh1\ngreen");
    }
}
