use crate::error::{Error, Result};

/// Numeric code length: 6 digits, proving email control.
const CODE_LENGTH: usize = 6;

/// One-time token hex length: 64 characters (32 bytes hex-encoded).
const TOKEN_HEX_LENGTH: usize = 64;

/// Generate a 6-digit numeric secret for email verification or password reset.
///
/// Always in the range 100000..=999999, so the string form is exactly six
/// digits with no leading zero.
pub fn generate_numeric_code() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    rng.random_range(100_000..=999_999u32).to_string()
}

/// Generate a cryptographically random one-time token for admin onboarding.
///
/// Returns a 32-byte (256-bit) random value as a 64-character hex string.
pub fn generate_one_time_token() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Validates that a code string is exactly 6 ASCII digits.
pub fn validate_code_format(code: &str) -> Result<()> {
    if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation("Code must be exactly 6 digits".to_string()));
    }
    Ok(())
}

/// Validates that a token string is exactly 64 hex characters.
pub fn validate_token_format(token: &str) -> Result<()> {
    if token.len() != TOKEN_HEX_LENGTH {
        return Err(Error::validation(
            "Token must be exactly 64 characters (32 bytes hex-encoded)".to_string(),
        ));
    }

    if !token.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::validation(
            "Token must contain only hexadecimal characters".to_string(),
        ));
    }

    Ok(())
}
