//! HTTP status codes and their canonical reason phrases.
//!
//! [`Status`] is a validated code: it only exists for codes that carry a
//! non-empty canonical text. `/status/{status_code}` echoes every one of them
//! except the informational 1xx range.
//!
//! ```rust
//! use webtester::Status;
//!
//! assert_eq!(Status::from_code(418).map(Status::canonical_text), Some("I'm a Teapot"));
//! assert!(Status::from_code(299).is_none());
//! ```

use std::fmt;

/// An HTTP status code with a registered reason phrase.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Status(u16);

impl Status {
    pub const OK: Status = Status(200);
    pub const NO_CONTENT: Status = Status(204);
    pub const BAD_REQUEST: Status = Status(400);
    pub const NOT_FOUND: Status = Status(404);
    pub const IM_A_TEAPOT: Status = Status(418);
    pub const INTERNAL_SERVER_ERROR: Status = Status(500);
    pub const SERVICE_UNAVAILABLE: Status = Status(503);

    /// Validates `code`: `None` unless it has a non-empty canonical text.
    pub fn from_code(code: u16) -> Option<Status> {
        if canonical_text(code).is_empty() { None } else { Some(Status(code)) }
    }

    pub fn code(self) -> u16 {
        self.0
    }

    pub fn canonical_text(self) -> &'static str {
        canonical_text(self.0)
    }

    /// 1xx: interim responses, never the final answer to a request.
    pub fn is_informational(self) -> bool {
        (100..200).contains(&self.0)
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        s.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.canonical_text())
    }
}

/// Canonical reason phrase for `code`, or `""` when the code is unregistered.
pub fn canonical_text(code: u16) -> &'static str {
    match code {
        100 => "Continue",
        101 => "Switching Protocols",
        102 => "Processing",
        103 => "Early Hints",

        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        207 => "Multi-Status",
        208 => "Already Reported",
        226 => "IM Used",

        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",

        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Content Too Large",
        414 => "URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Range Not Satisfiable",
        417 => "Expectation Failed",
        418 => "I'm a Teapot",
        421 => "Misdirected Request",
        422 => "Unprocessable Content",
        423 => "Locked",
        424 => "Failed Dependency",
        425 => "Too Early",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        451 => "Unavailable For Legal Reasons",

        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        506 => "Variant Also Negotiates",
        507 => "Insufficient Storage",
        508 => "Loop Detected",
        510 => "Not Extended",
        511 => "Network Authentication Required",

        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_codes_validate() {
        for code in [100, 200, 204, 305, 404, 418, 451, 511] {
            let status = Status::from_code(code).expect("registered code");
            assert_eq!(status.code(), code);
            assert!(!status.canonical_text().is_empty());
        }
    }

    #[test]
    fn unregistered_codes_are_rejected() {
        for code in [0, 99, 199, 306, 420, 599, 999, u16::MAX] {
            assert!(Status::from_code(code).is_none(), "{code} should be rejected");
        }
    }

    #[test]
    fn informational_range() {
        assert!(Status::from_code(103).unwrap().is_informational());
        assert!(!Status::OK.is_informational());
    }

    #[test]
    fn display_includes_reason() {
        assert_eq!(Status::NOT_FOUND.to_string(), "404 Not Found");
    }
}
