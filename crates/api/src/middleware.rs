use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// Log one line per request with method, path, status and latency.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed = start.elapsed();
    if status.is_server_error() {
        tracing::error!(%method, %path, %status, ?elapsed, "Request completed");
    } else {
        tracing::info!(%method, %path, %status, ?elapsed, "Request completed");
    }
    response
}
