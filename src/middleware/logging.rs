//! Request logging middleware.
//!
//! One line per request: method, path, status, latency and, once the token
//! guard has admitted the call, the caller's subject. Headers are never
//! logged, so bearer tokens stay out of the log stream.

use crate::auth::AuthenticatedUser;
use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// Subject recorded for requests the guard never admitted.
const ANONYMOUS: &str = "-";

pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if path == "/health" {
        return next.run(request).await;
    }

    let start = Instant::now();
    let response = next.run(request).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let status = response.status();
    let user = response
        .extensions()
        .get::<AuthenticatedUser>()
        .map_or(ANONYMOUS, |u| u.0.as_str());

    if status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), user, latency_ms, "Request failed");
    } else if status == axum::http::StatusCode::UNAUTHORIZED {
        info!(%method, %path, latency_ms, "Request unauthorized");
    } else {
        info!(%method, %path, status = status.as_u16(), user, latency_ms, "Request handled");
    }

    response
}
