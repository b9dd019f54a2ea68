//! Shared response helpers for API handlers.
//!
//! Structured endpoints use a `{ "data": ... }` envelope via
//! [`DataResponse`]. Script endpoints answer with plain UTF-8 text bodies
//! built by [`text`] and [`empty`].

use axum::body::Body;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Content type of every plain-text script response.
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// 200 with `body` as `text/plain; charset=utf-8`.
pub fn text(body: impl Into<Body>) -> Response {
    ([(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)], body.into()).into_response()
}

/// 200 with no body; the answer to a key that is not in the registry.
pub fn empty() -> Response {
    Response::new(Body::empty())
}
