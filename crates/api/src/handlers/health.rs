use axum::{extract::State, http::StatusCode};
use parish_storage::StorageBackend;

use crate::state::AppState;

/// Liveness-and-readiness probe. Verifies the storage backend answers.
pub async fn healthz(State(state): State<AppState>) -> StatusCode {
    match state.storage().health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::error!(error = %e, "Storage health check failed");
            StatusCode::SERVICE_UNAVAILABLE
        },
    }
}
