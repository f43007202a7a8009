//! Request options.
//!
//! Each `with_*` constructor returns a `RequestOption`, a command that the
//! client applies to a fresh `Request` in the order given. Application stops
//! at the first option that fails and the request is discarded.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::request::{Header, QueryParams, Request};

/// A single mutation of a `Request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOption {
    Header { key: String, value: String },
    QueryParam { key: String, values: Vec<String> },
    QueryParams(QueryParams),
    Fragment(String),
    User(String),
    Timeout(Duration),
}

impl RequestOption {
    pub fn apply(self, request: &mut Request) -> Result<()> {
        match self {
            RequestOption::Header { key, value } => {
                validate_header(&key, &value)?;
                request.headers.push(Header::new(key, value));
            }
            RequestOption::QueryParam { key, values } => {
                request
                    .query_params
                    .get_or_insert_with(QueryParams::new)
                    .entry(key)
                    .extend(values);
            }
            RequestOption::QueryParams(params) => request.query_params = Some(params),
            RequestOption::Fragment(fragment) => request.fragment = fragment,
            RequestOption::User(user) => request.user = Some(user),
            RequestOption::Timeout(timeout) => request.timeout = Some(timeout),
        }
        Ok(())
    }
}

/// Apply `options` in order, stopping at the first failure.
pub(crate) fn apply_options(
    request: &mut Request,
    options: impl IntoIterator<Item = RequestOption>,
) -> Result<()> {
    for option in options {
        option.apply(request)?;
    }
    Ok(())
}

/// Append a header entry. Repeating a key appends another entry.
pub fn with_header(key: impl Into<String>, value: impl Into<String>) -> RequestOption {
    RequestOption::Header {
        key: key.into(),
        value: value.into(),
    }
}

/// Append `values` to the query parameter `key`.
pub fn with_query_param<I, V>(key: impl Into<String>, values: I) -> RequestOption
where
    I: IntoIterator<Item = V>,
    V: Into<String>,
{
    RequestOption::QueryParam {
        key: key.into(),
        values: values.into_iter().map(Into::into).collect(),
    }
}

/// Replace every query parameter set so far.
pub fn with_query_params(params: QueryParams) -> RequestOption {
    RequestOption::QueryParams(params)
}

/// `Authorization: Basic <token>`. The token must already be base64 encoded.
pub fn with_basic_auth(token: impl AsRef<str>) -> RequestOption {
    with_header("Authorization", format!("Basic {}", token.as_ref()))
}

/// `Authorization: Bearer <token>`.
pub fn with_bearer_token(token: impl AsRef<str>) -> RequestOption {
    with_header("Authorization", format!("Bearer {}", token.as_ref()))
}

pub fn with_fragment(fragment: impl Into<String>) -> RequestOption {
    RequestOption::Fragment(fragment.into())
}

pub fn with_user(user: impl Into<String>) -> RequestOption {
    RequestOption::User(user.into())
}

/// Deadline handed to the transport for the whole exchange.
pub fn with_timeout(timeout: Duration) -> RequestOption {
    RequestOption::Timeout(timeout)
}

// RFC 9110 field-name is a token; field values may not contain CR, LF or NUL.
fn validate_header(key: &str, value: &str) -> Result<()> {
    if key.is_empty() || !key.bytes().all(is_token_byte) {
        return Err(Error::OptionApplication(format!("invalid header name {key:?}")));
    }
    if value.bytes().any(|b| matches!(b, b'\r' | b'\n' | b'\0')) {
        return Err(Error::OptionApplication(format!("invalid value for header {key:?}")));
    }
    Ok(())
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    fn request() -> Request {
        Request::new(HttpMethod::Get, "https://example.test/items")
    }

    #[test]
    fn repeated_header_appends_entries() {
        let mut req = request();
        apply_options(&mut req, [with_header("A", "1"), with_header("A", "2")]).unwrap();
        assert_eq!(req.headers, vec![Header::new("A", "1"), Header::new("A", "2")]);
    }

    #[test]
    fn query_param_appends_to_existing_key() {
        let mut req = request();
        apply_options(
            &mut req,
            [
                with_query_param("page", ["1"]),
                with_query_param("page", ["2", "3"]),
            ],
        )
        .unwrap();
        assert_eq!(req.query_params.unwrap().get("page"), ["1", "2", "3"]);
    }

    #[test]
    fn query_params_replaces_everything() {
        let mut req = request();
        let replacement: QueryParams = [("sort", "asc")].into_iter().collect();
        apply_options(
            &mut req,
            [
                with_query_param("page", ["1"]),
                with_query_params(replacement.clone()),
            ],
        )
        .unwrap();
        assert_eq!(req.query_params, Some(replacement));
        assert_eq!(req.target_url(), "https://example.test/items?sort=asc");
    }

    #[test]
    fn auth_options_prefix_the_token() {
        let mut req = request();
        apply_options(
            &mut req,
            [with_basic_auth("dXNlcjpwYXNz"), with_bearer_token("tok")],
        )
        .unwrap();
        assert_eq!(
            req.headers,
            vec![
                Header::new("Authorization", "Basic dXNlcjpwYXNz"),
                Header::new("Authorization", "Bearer tok"),
            ]
        );
    }

    #[test]
    fn fragment_user_and_timeout_are_recorded() {
        let mut req = request();
        apply_options(
            &mut req,
            [
                with_fragment("top"),
                with_user("alice"),
                with_timeout(Duration::from_secs(5)),
            ],
        )
        .unwrap();
        assert_eq!(req.fragment, "top");
        assert_eq!(req.user.as_deref(), Some("alice"));
        assert_eq!(req.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn invalid_header_stops_application() {
        let mut req = request();
        let err = apply_options(
            &mut req,
            [
                with_header("X-Ok", "1"),
                with_header("X-Bad", "line\r\nbreak"),
                with_header("X-Never", "applied"),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, Error::OptionApplication(_)));
        assert_eq!(req.headers, vec![Header::new("X-Ok", "1")]);
    }

    #[test]
    fn header_name_must_be_a_token() {
        let mut req = request();
        let err = with_header("Bad Name", "v").apply(&mut req).unwrap_err();
        assert!(matches!(err, Error::OptionApplication(_)));

        let err = with_header("", "v").apply(&mut req).unwrap_err();
        assert!(matches!(err, Error::OptionApplication(_)));
        assert!(req.headers.is_empty());
    }
}
