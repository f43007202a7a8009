//! Read-only view of a completed exchange.
//!
//! # Design
//! The transport hands over a single-consumption body stream. The first
//! buffered accessor (`bytes`, `content`, `decode_json`) drains it into
//! memory and every later buffered access reads from that snapshot, so text
//! and JSON access can be mixed freely. The cost is holding the whole body in
//! memory; `into_reader` is the streaming alternative.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Cursor, Read};

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::http::BodyReader;
use crate::request::{Header, Request};

/// Status code and reason phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub code: u16,
    pub reason: String,
}

impl Status {
    /// Split a transport status line such as `"200 OK"`. Only the exact
    /// `"<code> "` prefix is removed; anything else is kept as the reason.
    pub fn from_line(code: u16, line: &str) -> Self {
        let prefix = format!("{code} ");
        let reason = line.strip_prefix(prefix.as_str()).unwrap_or(line);
        Self {
            code,
            reason: reason.to_string(),
        }
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.reason)
    }
}

/// Response body: the raw stream until first buffered access, then a snapshot.
pub struct Body {
    state: BodyState,
    // Start of the next JSON value in the snapshot.
    json_offset: usize,
}

enum BodyState {
    Stream(BodyReader),
    Buffered(Vec<u8>),
    /// Draining the stream failed. Every later access reports the same error.
    Failed { kind: io::ErrorKind, message: String },
}

impl Body {
    pub(crate) fn new(stream: BodyReader) -> Self {
        Self {
            state: BodyState::Stream(stream),
            json_offset: 0,
        }
    }

    fn buffered(&mut self) -> io::Result<&[u8]> {
        if let BodyState::Stream(stream) = &mut self.state {
            let mut bytes = Vec::new();
            self.state = match stream.read_to_end(&mut bytes) {
                Ok(_) => BodyState::Buffered(bytes),
                Err(e) => BodyState::Failed {
                    kind: e.kind(),
                    message: e.to_string(),
                },
            };
        }
        match &self.state {
            BodyState::Buffered(bytes) => Ok(bytes),
            BodyState::Failed { kind, message } => Err(io::Error::new(*kind, message.clone())),
            BodyState::Stream(_) => unreachable!("stream is drained above"),
        }
    }
}

/// Reader that keeps failing with the error that ended a buffered read.
struct FailedReader {
    kind: io::ErrorKind,
    message: String,
}

impl Read for FailedReader {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(self.kind, self.message.clone()))
    }
}

/// A completed HTTP exchange.
pub struct Response {
    request: Request,
    status: Status,
    headers: Vec<Header>,
    body: Body,
}

impl Response {
    pub(crate) fn new(
        request: Request,
        status: Status,
        headers: Vec<Header>,
        body: Body,
    ) -> Self {
        Self {
            request,
            status,
            headers,
            body,
        }
    }

    /// The request that produced this response. Its body has been consumed.
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// All values of every header named `key` (ASCII case-insensitive),
    /// joined with `,`. Empty when the header is absent.
    ///
    /// Joining is wrong for headers whose values may contain commas, such as
    /// `Set-Cookie`; use `header_values` for those.
    pub fn header(&self, key: &str) -> String {
        self.header_values(key).join(",")
    }

    pub fn header_values(&self, key: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|h| h.is(key))
            .flat_map(|h| h.values.iter().map(String::as_str))
            .collect()
    }

    /// The whole body. Read from the transport once, then served from memory.
    pub fn bytes(&mut self) -> Result<&[u8]> {
        let Response { request, body, .. } = self;
        body.buffered().map_err(|e| Error::Transport {
            method: request.method,
            url: request.target_url(),
            source: Box::new(e),
        })
    }

    /// The body as text. Invalid UTF-8 is replaced, not rejected.
    pub fn content(&mut self) -> Result<Cow<'_, str>> {
        self.bytes().map(String::from_utf8_lossy)
    }

    /// Decode the next JSON value in the body.
    ///
    /// Repeated calls walk a body of concatenated values. Once no value is
    /// left the call fails with `Error::Decode`.
    pub fn decode_json<T: DeserializeOwned>(&mut self) -> Result<T> {
        let offset = self.body.json_offset;
        let bytes = self.bytes()?;
        let rest = bytes.get(offset..).unwrap_or_default();

        let mut values = serde_json::Deserializer::from_slice(rest).into_iter::<T>();
        let value = match values.next() {
            Some(Ok(value)) => value,
            Some(Err(e)) => return Err(Error::Decode(e.to_string())),
            None => return Err(Error::Decode("no more JSON values in body".to_string())),
        };
        let consumed = values.byte_offset();
        self.body.json_offset = offset + consumed;
        Ok(value)
    }

    /// The unread body as a stream, without buffering it first.
    ///
    /// After a buffered access this yields the part of the snapshot that
    /// `decode_json` has not consumed yet. If buffering failed, the reader
    /// fails with the same error.
    pub fn into_reader(self) -> BodyReader {
        let Body { state, json_offset } = self.body;
        match state {
            BodyState::Stream(stream) => stream,
            BodyState::Buffered(mut buffer) => {
                buffer.drain(..json_offset.min(buffer.len()));
                Box::new(Cursor::new(buffer))
            }
            BodyState::Failed { kind, message } => Box::new(FailedReader { kind, message }),
        }
    }

    /// Release the body stream and with it the transport's connection.
    /// Dropping the response has the same effect.
    pub fn close(self) {
        log::trace!("closing response for {}", self.request.url);
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("request", &self.request)
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
