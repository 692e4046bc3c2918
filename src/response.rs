//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! A [`Response`] is a plain value until the server converts it to a hyper
//! response, so middleware can rewrite status, headers and body on the way
//! out without any writer plumbing.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use tracing::warn;

use crate::status::Status;

pub(crate) const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// An outgoing HTTP response.
///
/// ```rust
/// use webtester::{Response, Status};
///
/// Response::text("OK");
/// Response::status(Status::NO_CONTENT);
/// Response::builder()
///     .status(Status::BAD_REQUEST)
///     .header("cache-control", "no-store")
///     .text("invalid status code: abc");
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: u16,
}

impl Response {
    /// `200 OK` with a `text/plain; charset=utf-8` body.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self { body: Vec::new(), headers: Vec::new(), status: code.into() }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: Status::OK.into() }
    }

    pub fn status_code(&self) -> u16 { self.status }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }

    /// Case-insensitive header lookup; returns the first value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replaces every value of `name` with `value`.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.to_owned()));
    }

    /// Appends `extra` after whatever body is already present. The status is
    /// left untouched.
    pub fn append_body(&mut self, extra: &[u8]) {
        self.body.extend_from_slice(extra);
    }

    /// Converts into the hyper representation. `content-length` is derived
    /// from the body by hyper. Headers that are not valid HTTP are dropped.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = StatusCode::from_u16(self.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        for (name, value) in self.headers {
            match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
                (Ok(name), Ok(value)) => {
                    res.headers_mut().append(name, value);
                }
                _ => warn!(header = %name, "dropping invalid response header"),
            }
        }
        res
    }
}

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: u16,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code.into();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(TEXT_PLAIN, body.into().into_bytes())
    }

    /// Terminate with a body of an explicit content type.
    pub fn bytes(self, content_type: &str, body: Vec<u8>) -> Response {
        self.finish(content_type, body)
    }

    fn finish(self, content_type: &str, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.to_owned())];
        headers.extend(self.headers);
        Response { body, headers, status: self.status }
    }
}

/// Conversion into an HTTP [`Response`].
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for Status {
    fn into_response(self) -> Response { Response::status(self) }
}
