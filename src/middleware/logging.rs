//! Request logging middleware.
//!
//! Every request runs inside an `http_request` span. The auth middleware
//! records `user_id` on it once a bearer token resolves to an account.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{field, info, info_span, warn, Instrument};

/// Logs at INFO level for completed requests, WARN level for 5xx.
///
/// Only the path is logged; query strings and headers (bearer tokens) never are.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = info_span!(
        "http_request",
        method = %method,
        path = %path,
        user_id = field::Empty,
        status = field::Empty,
        latency_ms = field::Empty,
    );

    let start = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    span.record("status", status);
    span.record("latency_ms", latency_ms);

    let _guard = span.enter();
    match status {
        500.. => warn!(status, latency_ms, "Request failed (5xx)"),
        401 => info!(status, latency_ms, "Request rejected, not authenticated"),
        400..=499 => info!(status, latency_ms, "Request rejected (4xx)"),
        _ => info!(status, latency_ms, "Request completed"),
    }

    response
}
