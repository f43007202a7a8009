//! Verb functions on a process-wide default client.
//!
//! The default client is created on first use with `Client::new()` and cannot
//! be reconfigured afterwards. Code that needs a custom transport, or wants
//! to keep cookies separate, should construct and pass its own `Client`.

use std::io::Read;

use once_cell::sync::Lazy;

use crate::client::Client;
use crate::error::Result;
use crate::options::RequestOption;
use crate::response::Response;

static DEFAULT_CLIENT: Lazy<Client> = Lazy::new(Client::new);

/// The shared client behind the free functions in this module.
pub fn default_client() -> &'static Client {
    &DEFAULT_CLIENT
}

/// Issue a GET to `url`.
pub fn get(url: &str, options: impl IntoIterator<Item = RequestOption>) -> Result<Response> {
    DEFAULT_CLIENT.get(url, options)
}

pub fn delete(url: &str, options: impl IntoIterator<Item = RequestOption>) -> Result<Response> {
    DEFAULT_CLIENT.delete(url, options)
}

pub fn head(url: &str, options: impl IntoIterator<Item = RequestOption>) -> Result<Response> {
    DEFAULT_CLIENT.head(url, options)
}

pub fn trace(url: &str, options: impl IntoIterator<Item = RequestOption>) -> Result<Response> {
    DEFAULT_CLIENT.trace(url, options)
}

/// Issue a POST to `url` with `body`.
pub fn post(
    url: &str,
    body: impl Read + Send + 'static,
    options: impl IntoIterator<Item = RequestOption>,
) -> Result<Response> {
    DEFAULT_CLIENT.post(url, body, options)
}

pub fn put(
    url: &str,
    body: impl Read + Send + 'static,
    options: impl IntoIterator<Item = RequestOption>,
) -> Result<Response> {
    DEFAULT_CLIENT.put(url, body, options)
}
