use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use parish_core::AuthContext;
use parish_types::Error;

use crate::{error::ApiError, state::AppState};

/// Extracts the authenticated identity from the `Authorization` header.
///
/// Handlers that take `Auth` are protected: a missing or malformed header
/// rejects the request before the handler runs. The session token is
/// verified against the shared issuer; role checks stay in the lifecycle
/// layer where the operation is known.
pub struct Auth(pub AuthContext);

impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Err(ApiError(Error::auth("No token provided")));
        };
        let context = state
            .sessions()
            .verify(token)
            .map_err(|_| Error::auth("Invalid or expired token"))?;
        Ok(Self(context))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
