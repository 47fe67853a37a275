use std::backtrace::Backtrace;

use snafu::Snafu;

/// Result type alias for identity operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the identity core.
///
/// All variants include backtraces for debugging. Use the constructor methods
/// (e.g., `Error::validation("message")`) to create errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Configuration errors
    #[snafu(display("Configuration error: {message}"))]
    Config { message: String, backtrace: Backtrace },

    /// Storage errors
    #[snafu(display("Storage error: {message}"))]
    Storage { message: String, backtrace: Backtrace },

    /// Malformed or missing input
    #[snafu(display("Validation error: {message}"))]
    Validation { message: String, backtrace: Backtrace },

    /// No matching identity
    #[snafu(display("Not found: {message}"))]
    NotFound { message: String, backtrace: Backtrace },

    /// Duplicate email
    #[snafu(display("Already exists: {message}"))]
    AlreadyExists { message: String, backtrace: Backtrace },

    /// Bad credentials or a bad/expired/missing session token
    #[snafu(display("Authentication error: {message}"))]
    Auth { message: String, backtrace: Backtrace },

    /// Role not permitted for the operation
    #[snafu(display("Authorization error: {message}"))]
    Forbidden { message: String, backtrace: Backtrace },

    /// A presented verification or reset code does not match
    #[snafu(display("Invalid code: {message}"))]
    InvalidCode { message: String, backtrace: Backtrace },

    /// A presented one-time token does not match
    #[snafu(display("Invalid token: {message}"))]
    InvalidToken { message: String, backtrace: Backtrace },

    /// A matching secret exists but its validity window has passed
    #[snafu(display("Expired: {message}"))]
    Expired { message: String, backtrace: Backtrace },

    /// The account has already completed email verification
    #[snafu(display("Already verified: {message}"))]
    AlreadyVerified { message: String, backtrace: Backtrace },

    /// No reset code has been issued for the account
    #[snafu(display("No active reset: {message}"))]
    NoActiveReset { message: String, backtrace: Backtrace },

    /// Notification (or other external collaborator) failure
    #[snafu(display("External service error: {message}"))]
    External { message: String, backtrace: Backtrace },

    /// Internal system errors
    #[snafu(display("Internal error: {message}"))]
    Internal { message: String, backtrace: Backtrace },
}

impl Error {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        ConfigSnafu { message: message.into() }.build()
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        StorageSnafu { message: message.into() }.build()
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ValidationSnafu { message: message.into() }.build()
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        NotFoundSnafu { message: message.into() }.build()
    }

    /// Create an already exists error
    pub fn already_exists(message: impl Into<String>) -> Self {
        AlreadyExistsSnafu { message: message.into() }.build()
    }

    /// Create an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        AuthSnafu { message: message.into() }.build()
    }

    /// Create an authorization error
    pub fn forbidden(message: impl Into<String>) -> Self {
        ForbiddenSnafu { message: message.into() }.build()
    }

    /// Create an invalid code error
    pub fn invalid_code(message: impl Into<String>) -> Self {
        InvalidCodeSnafu { message: message.into() }.build()
    }

    /// Create an invalid token error
    pub fn invalid_token(message: impl Into<String>) -> Self {
        InvalidTokenSnafu { message: message.into() }.build()
    }

    /// Create an expired-secret error
    pub fn expired(message: impl Into<String>) -> Self {
        ExpiredSnafu { message: message.into() }.build()
    }

    /// Create an already-verified error
    pub fn already_verified(message: impl Into<String>) -> Self {
        AlreadyVerifiedSnafu { message: message.into() }.build()
    }

    /// Create a no-active-reset error
    pub fn no_active_reset(message: impl Into<String>) -> Self {
        NoActiveResetSnafu { message: message.into() }.build()
    }

    /// Create an external service error
    pub fn external(message: impl Into<String>) -> Self {
        ExternalSnafu { message: message.into() }.build()
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        InternalSnafu { message: message.into() }.build()
    }

    // =========================================================================
    // Metadata accessors
    // =========================================================================

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Config { .. } => 500,
            Error::Storage { .. } => 500,
            Error::Validation { .. } => 400,
            Error::NotFound { .. } => 404,
            Error::AlreadyExists { .. } => 409,
            Error::Auth { .. } => 401,
            Error::Forbidden { .. } => 403,
            Error::InvalidCode { .. } => 400,
            Error::InvalidToken { .. } => 400,
            Error::Expired { .. } => 400,
            Error::AlreadyVerified { .. } => 400,
            Error::NoActiveReset { .. } => 400,
            Error::External { .. } => 500,
            Error::Internal { .. } => 500,
        }
    }

    /// Get error code for client consumption
    pub fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "CONFIGURATION_ERROR",
            Error::Storage { .. } => "STORAGE_ERROR",
            Error::Validation { .. } => "VALIDATION_ERROR",
            Error::NotFound { .. } => "NOT_FOUND",
            Error::AlreadyExists { .. } => "ALREADY_EXISTS",
            Error::Auth { .. } => "AUTHENTICATION_ERROR",
            Error::Forbidden { .. } => "AUTHORIZATION_ERROR",
            Error::InvalidCode { .. } => "INVALID_CODE",
            Error::InvalidToken { .. } => "INVALID_TOKEN",
            Error::Expired { .. } => "EXPIRED",
            Error::AlreadyVerified { .. } => "ALREADY_VERIFIED",
            Error::NoActiveReset { .. } => "NO_ACTIVE_RESET",
            Error::External { .. } => "EXTERNAL_SERVICE_ERROR",
            Error::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// The user-facing message carried by this error.
    pub fn message(&self) -> &str {
        match self {
            Error::Config { message, .. }
            | Error::Storage { message, .. }
            | Error::Validation { message, .. }
            | Error::NotFound { message, .. }
            | Error::AlreadyExists { message, .. }
            | Error::Auth { message, .. }
            | Error::Forbidden { message, .. }
            | Error::InvalidCode { message, .. }
            | Error::InvalidToken { message, .. }
            | Error::Expired { message, .. }
            | Error::AlreadyVerified { message, .. }
            | Error::NoActiveReset { message, .. }
            | Error::External { message, .. }
            | Error::Internal { message, .. } => message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(Error::validation("x").status_code(), 400);
        assert_eq!(Error::not_found("x").status_code(), 404);
        assert_eq!(Error::already_exists("x").status_code(), 409);
        assert_eq!(Error::auth("x").status_code(), 401);
        assert_eq!(Error::forbidden("x").status_code(), 403);
        assert_eq!(Error::invalid_code("x").status_code(), 400);
        assert_eq!(Error::invalid_token("x").status_code(), 400);
        assert_eq!(Error::expired("x").status_code(), 400);
        assert_eq!(Error::already_verified("x").status_code(), 400);
        assert_eq!(Error::no_active_reset("x").status_code(), 400);
        assert_eq!(Error::external("x").status_code(), 500);
        assert_eq!(Error::internal("x").status_code(), 500);
    }

    #[test]
    fn message_is_preserved() {
        let err = Error::invalid_code("Invalid code.");
        assert_eq!(err.message(), "Invalid code.");
        assert_eq!(err.error_code(), "INVALID_CODE");
    }

    #[test]
    fn display_includes_message() {
        let err = Error::auth("Invalid credentials.");
        assert!(err.to_string().contains("Invalid credentials."));
    }
}
