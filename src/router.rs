//! Radix-tree request router.
//!
//! Routes are method-agnostic: a path answers every method. Lookup is
//! O(path-length) via [`matchit`]. The router also owns the middleware chain,
//! which wraps the whole route table, misses included.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler};
use crate::middleware::{Chain, Middleware};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each [`Router::route`] and [`Router::layer`] call returns `self` so
/// registrations chain naturally.
pub struct Router {
    tree: MatchitRouter<Arc<str>>,
    handlers: HashMap<Arc<str>, BoxedHandler>,
    chain: Chain,
}

impl Router {
    pub fn new() -> Self {
        Self { tree: MatchitRouter::new(), handlers: HashMap::new(), chain: Chain::new() }
    }

    /// Register a handler for a path. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust
    /// # use webtester::{Request, Response, Router};
    /// # async fn status(_: Request) -> Response { Response::text("") }
    /// Router::new().route("/status/{status_code}", status);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the path is malformed or already registered.
    pub fn route(mut self, path: &str, handler: impl Handler) -> Self {
        let pattern: Arc<str> = Arc::from(path);
        self.tree
            .insert(path, Arc::clone(&pattern))
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self.handlers.insert(pattern, handler.into_boxed_handler());
        self
    }

    /// Append a middleware layer. Layers registered first run outermost.
    pub fn layer(mut self, layer: impl Middleware) -> Self {
        self.chain.push(layer);
        self
    }

    /// Compose the middleware chain around the route table.
    pub fn into_dispatcher(self) -> Dispatcher {
        debug!(routes = self.handlers.len(), layers = self.chain.len(), "composing router");
        let endpoint: BoxedHandler = Arc::new(Endpoint { handlers: self.handlers });
        Dispatcher { tree: self.tree, handler: self.chain.compose(endpoint) }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

/// A router with its middleware chain composed, ready to serve.
pub struct Dispatcher {
    tree: MatchitRouter<Arc<str>>,
    handler: BoxedHandler,
}

impl Dispatcher {
    /// Routes one request through the middleware chain and returns the
    /// response. The request body is not read.
    pub async fn dispatch<B>(&self, req: http::Request<B>) -> Response {
        let (parts, _) = req.into_parts();
        let path = parts.uri.path().to_owned();
        let (route, params) = self.resolve(&path);
        let req = Request::new(parts.method, path, parts.headers, params, route);
        self.handler.call(req).await
    }

    fn resolve(&self, path: &str) -> (Option<Arc<str>>, HashMap<String, String>) {
        match self.tree.at(path) {
            Ok(matched) => {
                let params = matched.params.iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                (Some(Arc::clone(matched.value)), params)
            }
            Err(_) => (None, HashMap::new()),
        }
    }
}

/// The base handler: calls the handler registered for the matched route, or
/// answers 404.
struct Endpoint {
    handlers: HashMap<Arc<str>, BoxedHandler>,
}

impl ErasedHandler for Endpoint {
    fn call(&self, req: Request) -> BoxFuture {
        match req.route().and_then(|route| self.handlers.get(route)) {
            Some(handler) => handler.call(req),
            None => Box::pin(async { not_found() }),
        }
    }
}

pub(crate) fn not_found() -> Response {
    Response::builder().status(Status::NOT_FOUND).text("404 page not found\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::SetHeader;

    async fn echo_param(req: Request) -> String {
        format!("{}|{}", req.route().unwrap_or("-"), req.param("id").unwrap_or("-"))
    }

    fn get(path: &str) -> http::Request<()> {
        http::Request::get(path).body(()).unwrap()
    }

    #[tokio::test]
    async fn extracts_params_and_route() {
        let app = Router::new().route("/items/{id}", echo_param).into_dispatcher();
        let res = app.dispatch(get("/items/42?x=1")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"/items/{id}|42");
    }

    #[tokio::test]
    async fn routes_are_method_agnostic() {
        let app = Router::new().route("/items/{id}", echo_param).into_dispatcher();
        let req = http::Request::post("/items/7").body(()).unwrap();
        assert_eq!(app.dispatch(req).await.body(), b"/items/{id}|7");
    }

    #[tokio::test]
    async fn misses_are_404() {
        let app = Router::new().route("/", echo_param).into_dispatcher();
        for path in ["/nope", "/items", "//"] {
            let res = app.dispatch(get(path)).await;
            assert_eq!(res.status_code(), 404, "{path}");
        }
    }

    #[tokio::test]
    async fn misses_pass_through_middleware() {
        let app = Router::new()
            .route("/", echo_param)
            .layer(SetHeader::new("x-served-by", "webtester"))
            .into_dispatcher();

        let res = app.dispatch(get("/missing")).await;
        assert_eq!(res.status_code(), 404);
        assert_eq!(res.header("x-served-by"), Some("webtester"));
    }

    #[test]
    #[should_panic(expected = "invalid route `/dup`")]
    fn duplicate_routes_panic() {
        let _ = Router::new().route("/dup", echo_param).route("/dup", echo_param);
    }
}
