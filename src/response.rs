//! Fixed fallback responses.
//!
//! The two responses the listener substitutes when no handler-supplied one
//! applies. Bodies are constructed atomically; nothing here streams.

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;

/// Response substituted when the cancellation signal has fired.
///
/// 499 is the de-facto "client closed request" code. It is absent from the
/// IANA registry, so there is no `StatusCode` constant for it; the builder
/// accepts any code in 100..=999.
pub(crate) fn request_aborted() -> Response {
    Response::builder()
        .status(499)
        .body(Body::from("Request aborted"))
        .unwrap()
}

/// Response substituted when a handler failure goes unrecovered.
pub(crate) fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("Internal Server Error"))
        .unwrap()
}
