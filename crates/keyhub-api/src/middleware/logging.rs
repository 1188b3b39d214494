//! Per-request access log.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, info, warn};

use super::identity::ResolvedIdentity;

/// Emit one line per request with status, latency and the caller when known.
///
/// Health checks are logged at `debug`; server errors at `warn`.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    // The identity layer runs inside this one, so the caller is read back
    // from the response extensions it copied there.
    let caller = response
        .extensions()
        .get::<ResolvedIdentity>()
        .and_then(|r| r.0.as_ref())
        .map(|i| i.user_id.to_string());

    if path.starts_with("/api/health") {
        debug!(%method, %path, status, elapsed_ms, "HTTP request");
    } else if response.status().is_server_error() {
        warn!(%method, %path, status, elapsed_ms, caller = caller.as_deref(), "HTTP request failed");
    } else {
        info!(%method, %path, status, elapsed_ms, caller = caller.as_deref(), "HTTP request");
    }

    response
}
