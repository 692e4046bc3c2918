//! Incoming HTTP request type.

use std::collections::HashMap;
use std::sync::Arc;

use http::{HeaderMap, Method};

/// An incoming HTTP request, as seen by middleware and responders.
///
/// Bodies are not buffered: every route this service exposes is answered from
/// the request line and headers alone.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: HeaderMap,
    pub(crate) params: HashMap<String, String>,
    pub(crate) route: Option<Arc<str>>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        headers: HeaderMap,
        params: HashMap<String, String>,
        route: Option<Arc<str>>,
    ) -> Self {
        Self { method, path, headers, params, route }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }

    /// Header lookup by name; `None` when absent or not visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/status/{status_code}`, `req.param("status_code")` on
    /// `/status/418` returns `Some("418")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The route pattern that matched this request, e.g.
    /// `/status/{status_code}`. `None` when no route matched.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn test(method: &str, path: &str) -> Self {
        let method = Method::from_bytes(method.as_bytes()).unwrap();
        Self::new(method, path.to_owned(), HeaderMap::new(), HashMap::new(), None)
    }
}
