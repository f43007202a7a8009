use std::collections::BTreeMap;

use axum::{
    extract::RawQuery,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use uuid::Uuid;

/// What `/echo` saw of the incoming request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: Option<String>,
    /// Lower-cased header names, values in arrival order.
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub session: String,
}

pub const SESSION_COOKIE: &str = "session";

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/redirect", get(redirect))
        .route("/session/login", get(login))
        .route("/session/whoami", get(whoami))
        .route("/stream", get(stream))
        .route("/headers/multi", get(multi_headers))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    let mut seen: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in &headers {
        if let Ok(value) = value.to_str() {
            seen.entry(name.as_str().to_string())
                .or_default()
                .push(value.to_string());
        }
    }
    Json(Echo {
        method: method.to_string(),
        query,
        headers: seen,
        body,
    })
}

async fn redirect() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/echo")])
}

async fn login() -> impl IntoResponse {
    let id = Uuid::new_v4().to_string();
    let cookie = format!("{SESSION_COOKIE}={id}; Path=/");
    ([(header::SET_COOKIE, cookie)], Json(Session { session: id }))
}

async fn whoami(headers: HeaderMap) -> Result<Json<Session>, StatusCode> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| Json(Session { session: value.to_string() }))
        .ok_or(StatusCode::UNAUTHORIZED)
}

/// Newline-delimited JSON values.
async fn stream() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        "{\"n\":1}\n{\"n\":2}\n{\"n\":3}\n",
    )
}

async fn multi_headers() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.append("x-multi", HeaderValue::from_static("v1"));
    headers.append("x-multi", HeaderValue::from_static("v2"));
    (headers, "ok")
}
