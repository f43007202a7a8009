//! The mutable request descriptor that options are applied to.
//!
//! # Design
//! A `Request` is owned by the call that creates it. Options mutate it in
//! order, then `Client::send` moves it into the exchange and finally into the
//! `Response`. Headers are kept as an ordered list of entries, not a map, so
//! repeated keys survive until the client flattens them for the transport.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::http::{BodyReader, HttpMethod};

/// An HTTP header: one key with one or more values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub key: String,
    pub values: Vec<String>,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: vec![value.into()],
        }
    }

    /// ASCII case-insensitive key comparison.
    pub fn is(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

/// Query parameters: each key maps to an ordered list of values.
///
/// Keys are kept sorted so the encoded query string is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, Vec<String>>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the list for `key`, creating the key if absent.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Values for `key`, empty if absent.
    pub fn get(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `application/x-www-form-urlencoded` form, keys sorted, values in insertion order.
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.0 {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    pub(crate) fn entry(&mut self, key: String) -> &mut Vec<String> {
        self.0.entry(key).or_default()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.add(key, value);
        }
        params
    }
}

/// An HTTP request under construction.
pub struct Request {
    pub method: HttpMethod,
    /// Base URL, without query string or fragment.
    pub url: String,
    pub headers: Vec<Header>,
    pub body: Option<BodyReader>,
    /// `None` means no query string at all.
    pub query_params: Option<QueryParams>,
    /// Appended after `#` when non-empty.
    pub fragment: String,
    /// Informational only; never sent.
    pub user: Option<String>,
    /// Passed through to the transport untouched.
    pub timeout: Option<Duration>,
}

impl Request {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            query_params: None,
            fragment: String::new(),
            user: None,
            timeout: None,
        }
    }

    pub fn with_body(method: HttpMethod, url: impl Into<String>, body: BodyReader) -> Self {
        Self {
            body: Some(body),
            ..Self::new(method, url)
        }
    }

    /// The final target: base URL, then `?query` when there is a non-empty
    /// encoded query, then `#fragment` when the fragment is non-empty.
    pub fn target_url(&self) -> String {
        let mut target = self.url.clone();
        if let Some(params) = &self.query_params {
            let query = params.encode();
            if !query.is_empty() {
                target.push('?');
                target.push_str(&query);
            }
        }
        if !self.fragment.is_empty() {
            target.push('#');
            target.push_str(&self.fragment);
        }
        target
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("body", &self.body.as_ref().map(|_| ".."))
            .field("query_params", &self.query_params)
            .field("fragment", &self.fragment)
            .field("user", &self.user)
            .field("timeout", &self.timeout)
            .finish()
    }
}
