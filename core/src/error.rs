//! Error type for the requests client.
//!
//! # Design
//! Variants follow the point at which a call fails. `OptionApplication` and
//! `RequestConstruction` are raised before the transport is touched;
//! `Transport` and `Decode` can only happen once an exchange has started.
//! Transport failures are carried as-is, with the method and URL attached.

use thiserror::Error;

use crate::http::{HttpMethod, TransportError};

/// Errors returned by `Client` and `Response`.
#[derive(Debug, Error)]
pub enum Error {
    /// A request option rejected its input. No request was sent.
    #[error("request option failed: {0}")]
    OptionApplication(String),

    /// The request could not be built (bad method or URL). No request was sent.
    #[error("invalid request: {0}")]
    RequestConstruction(String),

    /// The transport failed, or the response body could not be read.
    #[error("{method} {url}: {source}")]
    Transport {
        method: HttpMethod,
        url: String,
        #[source]
        source: TransportError,
    },

    /// The response body is not the JSON the caller asked for.
    #[error("decoding failed: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
