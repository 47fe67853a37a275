use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use parish_types::Error;
use serde_json::json;

/// Wire-level error wrapper.
///
/// Maps the domain error taxonomy onto HTTP statuses and a
/// `{success, message}` JSON body. Internal errors are logged with their
/// real cause but reach the client as a generic message.
#[derive(Debug)]
pub struct ApiError(pub Error);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if status.is_server_error() {
            tracing::error!(error = %self.0, code = self.0.error_code(), "Request failed");
            "Server error.".to_string()
        } else {
            self.0.message().to_string()
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let response = ApiError(Error::invalid_code("Invalid code.")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn server_errors_are_masked() {
        let response = ApiError(Error::internal("secret detail")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError(Error::not_found("Member not found.")).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(Error::already_exists("Email already registered.")).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError(Error::auth("Invalid credentials.")).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError(Error::forbidden("Forbidden")).into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
