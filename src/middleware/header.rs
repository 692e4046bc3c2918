//! Fixed marker header.

use std::sync::Arc;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::request::Request;

/// Sets `name: value` on every response that passes through, overriding any
/// value an inner stage produced.
#[derive(Clone, Debug)]
pub struct SetHeader {
    name: Arc<str>,
    value: Arc<str>,
}

impl SetHeader {
    pub fn new(name: &str, value: &str) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

impl Middleware for SetHeader {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let name = Arc::clone(&self.name);
        let value = Arc::clone(&self.value);
        (move |req: Request| {
            let next = Arc::clone(&next);
            let name = Arc::clone(&name);
            let value = Arc::clone(&value);
            async move {
                let mut res = next.call(req).await;
                res.set_header(&name, &value);
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

    #[tokio::test]
    async fn sets_header_on_error_responses() {
        let handler = SetHeader::new("x-served-by", "webtester")
            .wrap((|_req: Request| async { Status::NOT_FOUND }).into_boxed_handler());

        let res = handler.call(Request::test("GET", "/missing")).await;
        assert_eq!(res.status_code(), 404);
        assert_eq!(res.header("x-served-by"), Some("webtester"));
    }

    #[tokio::test]
    async fn overrides_inner_value() {
        let handler = SetHeader::new("x-served-by", "webtester").wrap(
            (|_req: Request| async {
                Response::builder().header("X-Served-By", "someone-else").text("hi")
            })
            .into_boxed_handler(),
        );

        let res = handler.call(Request::test("GET", "/")).await;
        assert_eq!(res.header("x-served-by"), Some("webtester"));
    }
}
