#![deny(unsafe_code)]

//! # Parish API
//!
//! HTTP surface of the Parish identity service: axum handlers, the session
//! extractor and the router. Business rules live in `parish-core`; this
//! crate only translates between the wire and the lifecycles.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::Auth;
pub use routes::create_router_with_state;
pub use state::AppState;

use parish_types::error::{Error, Result};

/// Bind the listener and serve until the process is stopped.
pub async fn serve(listen: &str, router: axum::Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| Error::internal(format!("Failed to bind {listen}: {e}")))?;
    tracing::info!(%listen, "API server listening");
    axum::serve(listener, router)
        .await
        .map_err(|e| Error::internal(format!("Server error: {e}")))
}
