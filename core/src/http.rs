//! Wire-level request/response types and the transport seam.
//!
//! # Design
//! These types describe an HTTP exchange as plain data. The client builds an
//! `HttpRequest`, hands it to a `Transport`, and wraps the returned
//! `HttpResponse`. Nothing in this crate speaks the wire protocol; TLS,
//! connection reuse, redirects and cookies belong to the transport.
//!
//! Bodies are boxed readers rather than strings so a transport can stream
//! them in both directions.

use std::fmt;
use std::io::Read;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Trace,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Whether requests with this method conventionally carry a body.
    pub fn has_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    /// Method tokens are case-sensitive, as in HTTP itself.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "TRACE" => Ok(HttpMethod::Trace),
            other => Err(Error::RequestConstruction(format!(
                "unsupported method {other:?}"
            ))),
        }
    }
}

/// Readable body stream moved between the client and a transport.
pub type BodyReader = Box<dyn Read + Send>;

/// Error type a transport reports. Passed through to the caller untouched.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// An HTTP request described as plain data.
///
/// `headers` is `None` when the originating request carried no headers at
/// all. Otherwise each key appears once with its values in order.
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Option<Vec<(String, Vec<String>)>>,
    pub body: Option<BodyReader>,
    /// Opaque deadline for the whole exchange. Enforcing it is up to the transport.
    pub timeout: Option<Duration>,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("body", &self.body.as_ref().map(|_| ".."))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// An HTTP response described as plain data.
///
/// `status_line` is the status as the transport reports it, e.g. `"200 OK"`.
pub struct HttpResponse {
    pub status: u16,
    pub status_line: String,
    pub headers: Vec<(String, Vec<String>)>,
    pub body: BodyReader,
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("status_line", &self.status_line)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Anything able to execute one request/response exchange.
///
/// Implementations must be shareable across threads; whether concurrent
/// calls are actually safe is the implementation's business.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync,
{
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}
