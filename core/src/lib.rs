//! Fluent HTTP requests over a pluggable transport.
//!
//! # Overview
//! Callers pick a verb, pass a URL and a list of options, and get back a
//! `Response` with header helpers and lazily buffered body access. The
//! network exchange itself is delegated to a `Transport`; the default one is
//! a `ureq` agent with a cookie jar and redirect following turned off.
//!
//! ```no_run
//! use requests::{with_bearer_token, with_query_param, Client};
//!
//! let client = Client::new();
//! let mut resp = client.get(
//!     "https://example.test/items",
//!     [with_query_param("page", ["2"]), with_bearer_token("tok")],
//! )?;
//! println!("{} {}", resp.status(), resp.header("Content-Type"));
//! let items: serde_json::Value = resp.decode_json()?;
//! # let _ = items;
//! # Ok::<(), requests::Error>(())
//! ```
//!
//! # Design
//! - `Request` is a plain mutable descriptor; options are a `RequestOption`
//!   enum applied in order, stopping at the first failure.
//! - `Client` is stateless apart from its shared transport, so it is cheap to
//!   clone and can be injected wherever a transport stub is wanted in tests.
//! - The crate logs through the `log` facade at debug/trace level only and
//!   never installs a logger.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod options;
pub mod request;
pub mod response;
pub mod transport;

pub use api::{default_client, delete, get, head, post, put, trace};
pub use client::Client;
pub use error::{Error, Result};
pub use http::{BodyReader, HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use options::{
    with_basic_auth, with_bearer_token, with_fragment, with_header, with_query_param,
    with_query_params, with_timeout, with_user, RequestOption,
};
pub use request::{Header, QueryParams, Request};
pub use response::{Body, Response, Status};
pub use transport::{UreqTransport, UreqTransportBuilder};
