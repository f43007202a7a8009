//! HTTP client: one method per verb over a pluggable transport.
//!
//! # Design
//! `Client` holds only a shared `Transport` and carries no state of its own
//! between calls; cookies and pooled connections live in the transport. Each
//! verb builds a fresh `Request`, applies the caller's options in order and
//! hands the result to `send`, which translates it into an `HttpRequest`,
//! runs the exchange and wraps the outcome in a `Response`.

use std::io::Read;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::options::{apply_options, RequestOption};
use crate::request::{Header, Request};
use crate::response::{Body, Response, Status};
use crate::transport::UreqTransport;

/// Synchronous HTTP client.
///
/// Cloning is cheap and clones share the transport. `Client` is `Send +
/// Sync`; concurrent use is as safe as the transport makes it.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Client over the default `ureq` transport: cookies persist across
    /// calls, redirects are returned rather than followed.
    pub fn new() -> Self {
        Self::with_transport(UreqTransport::new())
    }

    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn get(
        &self,
        url: &str,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Response> {
        self.request(Request::new(HttpMethod::Get, url), options)
    }

    pub fn delete(
        &self,
        url: &str,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Response> {
        self.request(Request::new(HttpMethod::Delete, url), options)
    }

    pub fn head(
        &self,
        url: &str,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Response> {
        self.request(Request::new(HttpMethod::Head, url), options)
    }

    pub fn trace(
        &self,
        url: &str,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Response> {
        self.request(Request::new(HttpMethod::Trace, url), options)
    }

    pub fn post(
        &self,
        url: &str,
        body: impl Read + Send + 'static,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Response> {
        self.request(Request::with_body(HttpMethod::Post, url, Box::new(body)), options)
    }

    pub fn put(
        &self,
        url: &str,
        body: impl Read + Send + 'static,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Response> {
        self.request(Request::with_body(HttpMethod::Put, url, Box::new(body)), options)
    }

    fn request(
        &self,
        mut request: Request,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Response> {
        apply_options(&mut request, options)?;
        self.send(request)
    }

    /// Execute a fully built request.
    ///
    /// Only POST and PUT may carry a body.
    pub fn send(&self, mut request: Request) -> Result<Response> {
        let url = target_url(&request)?;
        let method = request.method;
        if request.body.is_some() && !method.has_body() {
            return Err(Error::RequestConstruction(format!(
                "{method} request cannot carry a body"
            )));
        }
        let http_request = HttpRequest {
            method,
            url: url.clone(),
            headers: flatten_headers(&request.headers),
            body: request.body.take(),
            timeout: request.timeout,
        };

        log::debug!("{method} {url}");
        let HttpResponse {
            status,
            status_line,
            headers,
            body,
        } = self
            .transport
            .execute(http_request)
            .map_err(|source| Error::Transport {
                method,
                url: url.clone(),
                source,
            })?;
        log::debug!("{method} {url} -> {status_line}");

        let headers = headers
            .into_iter()
            .map(|(key, values)| Header { key, values })
            .collect();
        Ok(Response::new(
            request,
            Status::from_line(status, &status_line),
            headers,
            Body::new(body),
        ))
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

fn target_url(request: &Request) -> Result<String> {
    if request.url.is_empty() {
        return Err(Error::RequestConstruction("empty URL".to_string()));
    }
    let target = request.target_url();
    url::Url::parse(&target)
        .map_err(|e| Error::RequestConstruction(format!("invalid URL {target:?}: {e}")))?;
    Ok(target)
}

/// Collapse header entries into one entry per key (ASCII case-insensitive,
/// first spelling wins), merging value lists in order. `None` when there are
/// no headers at all.
fn flatten_headers(headers: &[Header]) -> Option<Vec<(String, Vec<String>)>> {
    if headers.is_empty() {
        return None;
    }
    let mut flat: Vec<(String, Vec<String>)> = Vec::new();
    for header in headers {
        match flat.iter_mut().find(|(key, _)| header.is(key)) {
            Some((_, values)) => values.extend(header.values.iter().cloned()),
            None => flat.push((header.key.clone(), header.values.clone())),
        }
    }
    Some(flat)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::http::TransportError;
    use crate::options::{with_bearer_token, with_header, with_query_param, with_timeout};

    /// What the stub transport saw, minus the body stream.
    #[derive(Debug, Clone)]
    struct Seen {
        method: HttpMethod,
        url: String,
        headers: Option<Vec<(String, Vec<String>)>>,
        body: Option<String>,
        timeout: Option<Duration>,
    }

    /// Transport that records calls and answers with a canned response.
    #[derive(Clone, Default)]
    struct Stub {
        calls: Arc<Mutex<Vec<Seen>>>,
    }

    impl Stub {
        fn calls(&self) -> Vec<Seen> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Transport for Stub {
        fn execute(
            &self,
            request: HttpRequest,
        ) -> std::result::Result<HttpResponse, TransportError> {
            let body = request.body.map(|mut b| {
                let mut s = String::new();
                b.read_to_string(&mut s).unwrap();
                s
            });
            self.calls.lock().unwrap().push(Seen {
                method: request.method,
                url: request.url,
                headers: request.headers,
                body,
                timeout: request.timeout,
            });
            Ok(HttpResponse {
                status: 200,
                status_line: "200 OK".to_string(),
                headers: vec![
                    ("Content-Type".to_string(), vec!["application/json".to_string()]),
                    ("X-Multi".to_string(), vec!["a".to_string(), "b".to_string()]),
                ],
                body: Box::new(Cursor::new(br#"{"a":1}"#.to_vec())),
            })
        }
    }

    fn client() -> (Client, Stub) {
        let stub = Stub::default();
        (Client::with_transport(stub.clone()), stub)
    }

    #[test]
    fn get_with_query_and_bearer_token() {
        let (client, stub) = client();
        client
            .get(
                "https://example.test/items",
                [with_query_param("page", ["2"]), with_bearer_token("tok")],
            )
            .unwrap();

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, HttpMethod::Get);
        assert_eq!(calls[0].url, "https://example.test/items?page=2");
        assert_eq!(
            calls[0].headers,
            Some(vec![("Authorization".to_string(), vec!["Bearer tok".to_string()])])
        );
        assert!(calls[0].body.is_none());
    }

    #[test]
    fn every_verb_uses_its_method() {
        let (client, stub) = client();
        let url = "https://example.test/";
        client.get(url, []).unwrap();
        client.delete(url, []).unwrap();
        client.head(url, []).unwrap();
        client.trace(url, []).unwrap();
        client.post(url, Cursor::new(b"p".to_vec()), []).unwrap();
        client.put(url, Cursor::new(b"q".to_vec()), []).unwrap();

        let methods: Vec<HttpMethod> = stub.calls().iter().map(|c| c.method).collect();
        assert_eq!(
            methods,
            vec![
                HttpMethod::Get,
                HttpMethod::Delete,
                HttpMethod::Head,
                HttpMethod::Trace,
                HttpMethod::Post,
                HttpMethod::Put,
            ]
        );
        let calls = stub.calls();
        assert_eq!(calls[4].body.as_deref(), Some("p"));
        assert_eq!(calls[5].body.as_deref(), Some("q"));
    }

    #[test]
    fn no_headers_means_no_header_map() {
        let (client, stub) = client();
        client.get("https://example.test/", []).unwrap();
        assert!(stub.calls()[0].headers.is_none());
    }

    #[test]
    fn repeated_header_keys_merge_for_transport() {
        let (client, stub) = client();
        client
            .get(
                "https://example.test/",
                [
                    with_header("Accept", "text/plain"),
                    with_header("X-Id", "1"),
                    with_header("accept", "application/json"),
                ],
            )
            .unwrap();
        assert_eq!(
            stub.calls()[0].headers,
            Some(vec![
                (
                    "Accept".to_string(),
                    vec!["text/plain".to_string(), "application/json".to_string()]
                ),
                ("X-Id".to_string(), vec!["1".to_string()]),
            ])
        );
    }

    #[test]
    fn timeout_is_passed_through() {
        let (client, stub) = client();
        client
            .get("https://example.test/", [with_timeout(Duration::from_millis(250))])
            .unwrap();
        assert_eq!(stub.calls()[0].timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn response_wraps_transport_result() {
        let (client, _) = client();
        let mut resp = client.get("https://example.test/items", []).unwrap();

        assert_eq!(resp.status().code, 200);
        assert_eq!(resp.status().reason, "OK");
        assert_eq!(resp.header("content-type"), "application/json");
        assert_eq!(resp.header("X-Multi"), "a,b");
        assert_eq!(resp.request().method, HttpMethod::Get);
        assert_eq!(resp.request().url, "https://example.test/items");

        let value: serde_json::Value = resp.decode_json().unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn failing_option_skips_the_transport() {
        let (client, stub) = client();
        let err = client
            .get("https://example.test/", [with_header("Bad\nName", "v")])
            .unwrap_err();
        assert!(matches!(err, Error::OptionApplication(_)));
        assert!(stub.calls().is_empty());
    }

    #[test]
    fn malformed_url_skips_the_transport() {
        let (client, stub) = client();
        let err = client.get("not a url", []).unwrap_err();
        assert!(matches!(err, Error::RequestConstruction(_)));

        let err = client.get("", []).unwrap_err();
        assert!(matches!(err, Error::RequestConstruction(_)));
        assert!(stub.calls().is_empty());
    }

    #[test]
    fn transport_failure_is_returned_with_context() {
        let client = Client::with_transport(
            |_: HttpRequest| -> std::result::Result<HttpResponse, TransportError> {
                Err("connection refused".into())
            },
        );
        let err = client.get("https://example.test/down", []).unwrap_err();
        match err {
            Error::Transport { method, url, source } => {
                assert_eq!(method, HttpMethod::Get);
                assert_eq!(url, "https://example.test/down");
                assert_eq!(source.to_string(), "connection refused");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn send_executes_a_prebuilt_request() {
        let (client, stub) = client();
        let mut request = Request::new("DELETE".parse().unwrap(), "https://example.test/items/7");
        request.fragment = "gone".to_string();
        client.send(request).unwrap();
        assert_eq!(stub.calls()[0].url, "https://example.test/items/7#gone");
        assert_eq!(stub.calls()[0].method, HttpMethod::Delete);
    }

    #[test]
    fn body_on_bodiless_method_skips_the_transport() {
        let (client, stub) = client();
        for method in [HttpMethod::Get, HttpMethod::Head] {
            let request = Request::with_body(
                method,
                "https://example.test/items",
                Box::new(Cursor::new(b"stray".to_vec())),
            );
            let err = client.send(request).unwrap_err();
            assert!(matches!(err, Error::RequestConstruction(_)), "{method}");
        }
        assert!(stub.calls().is_empty());

        let request = Request::with_body(
            HttpMethod::Put,
            "https://example.test/items",
            Box::new(Cursor::new(b"kept".to_vec())),
        );
        client.send(request).unwrap();
        assert_eq!(stub.calls()[0].body.as_deref(), Some("kept"));
    }
}
