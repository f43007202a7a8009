//! Default transport backed by a `ureq` agent.
//!
//! # Design
//! The agent owns connection pooling, TLS and the cookie jar, so cookies set
//! by one call are sent on later calls through the same transport. Redirects
//! are not followed: the caller sees the 3xx response itself. Non-2xx
//! statuses are returned as data rather than errors, leaving status
//! interpretation to the caller.

use std::time::Duration;

use ureq::{Agent, RequestBuilder, SendBody};

use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// `Transport` implementation over `ureq`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Agent with a cookie jar and redirect following disabled.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> UreqTransportBuilder {
        UreqTransportBuilder::default()
    }

    /// Wrap an agent configured elsewhere.
    pub fn from_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Agent settings that the default transport exposes.
#[derive(Debug, Clone, Default)]
pub struct UreqTransportBuilder {
    max_redirects: u32,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl UreqTransportBuilder {
    /// Follow up to `n` redirects. Defaults to 0.
    pub fn max_redirects(mut self, n: u32) -> Self {
        self.max_redirects = n;
        self
    }

    /// Global timeout for every call made through the agent.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `User-Agent` sent on every call. Defaults to ureq's own.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> UreqTransport {
        let mut config = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(self.max_redirects)
            .max_redirects_will_error(false)
            .timeout_global(self.timeout);
        if let Some(user_agent) = self.user_agent {
            config = config.user_agent(user_agent);
        }
        UreqTransport::from_agent(config.build().new_agent())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
            timeout,
        } = request;
        let headers = headers.unwrap_or_default();

        log::trace!("ureq: {method} {url}");
        let response = match method {
            HttpMethod::Get => prepare(self.agent.get(&url), &headers, timeout).call(),
            HttpMethod::Delete => prepare(self.agent.delete(&url), &headers, timeout).call(),
            HttpMethod::Head => prepare(self.agent.head(&url), &headers, timeout).call(),
            HttpMethod::Trace => prepare(self.agent.trace(&url), &headers, timeout).call(),
            HttpMethod::Post | HttpMethod::Put => {
                let builder = if method == HttpMethod::Post {
                    self.agent.post(&url)
                } else {
                    self.agent.put(&url)
                };
                let builder = prepare(builder, &headers, timeout);
                match body {
                    Some(mut body) => builder.send(SendBody::from_reader(&mut body)),
                    None => builder.send_empty(),
                }
            }
        }?;

        let status = response.status();
        let status_line = match status.canonical_reason() {
            Some(reason) => format!("{} {reason}", status.as_u16()),
            None => status.as_u16().to_string(),
        };

        let mut response_headers: Vec<(String, Vec<String>)> = Vec::new();
        for name in response.headers().keys() {
            let values = response
                .headers()
                .get_all(name)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .map(str::to_string)
                .collect();
            response_headers.push((name.as_str().to_string(), values));
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            status_line,
            headers: response_headers,
            body: Box::new(response.into_body().into_reader()),
        })
    }
}

fn prepare<B>(
    mut builder: RequestBuilder<B>,
    headers: &[(String, Vec<String>)],
    timeout: Option<Duration>,
) -> RequestBuilder<B> {
    for (key, values) in headers {
        for value in values {
            builder = builder.header(key.as_str(), value.as_str());
        }
    }
    if let Some(timeout) = timeout {
        builder = builder.config().timeout_global(Some(timeout)).build();
    }
    builder
}
