use bon::bon;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{normalize_email, secret, validate_email};
use crate::error::Result;

/// Public self-registered member account.
///
/// One record per email. Verification and reset secrets live inline as
/// nullable fields; issuing a new secret overwrites (and thereby invalidates)
/// the previous one. Nothing hard-deletes a member record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberAccount {
    /// Display name
    pub name: String,

    /// Unique key within the member collection (lowercased, trimmed)
    pub email: String,

    /// One-way bcrypt hash; plaintext is discarded at the creation boundary
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// Pending email-ownership code, cleared on successful verification
    pub verification_code: Option<String>,

    /// Optional expiry for the verification code (None = never expires)
    pub verification_code_expires: Option<DateTime<Utc>>,

    /// Whether email ownership has been proven
    pub is_verified: bool,

    /// Pending password-reset code
    pub reset_code: Option<String>,

    /// Reset code validity deadline
    pub reset_code_expires: Option<DateTime<Utc>>,
}

#[bon]
impl MemberAccount {
    /// Create a new, unverified member with a pending verification code.
    ///
    /// The email is normalized (trimmed, lowercased) and validated; the code
    /// must be a 6-digit numeric secret from [`secret::generate_numeric_code`].
    #[builder(on(String, into), finish_fn = create)]
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        verification_code: String,
        verification_code_expires: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        let email = normalize_email(&email);
        validate_email(&email)?;
        secret::validate_code_format(&verification_code)?;
        Ok(Self {
            name,
            email,
            password_hash,
            created_at: Utc::now(),
            verification_code: Some(verification_code),
            verification_code_expires,
            is_verified: false,
            reset_code: None,
            reset_code_expires: None,
        })
    }

    /// Whether the pending verification code matches the candidate.
    ///
    /// Always false once verified (the code has been cleared).
    pub fn verification_code_matches(&self, candidate: &str) -> bool {
        self.verification_code.as_deref() == Some(candidate)
    }

    /// Whether the pending verification code has passed its expiry, if any.
    pub fn verification_code_expired(&self) -> bool {
        self.verification_code_expires.is_some_and(|deadline| Utc::now() > deadline)
    }

    /// Mark email ownership as proven and clear the verification secret.
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.verification_code = None;
        self.verification_code_expires = None;
    }

    /// Replace the verification code, invalidating any previous one.
    pub fn replace_verification_code(&mut self, code: String, ttl: Option<Duration>) {
        self.verification_code = Some(code);
        self.verification_code_expires = ttl.map(|ttl| Utc::now() + ttl);
    }

    /// Issue a reset code valid for `ttl`, overwriting any prior code.
    pub fn issue_reset_code(&mut self, code: String, ttl: Duration) {
        self.reset_code = Some(code);
        self.reset_code_expires = Some(Utc::now() + ttl);
    }

    /// Whether a reset code has been issued (regardless of expiry).
    pub fn has_active_reset(&self) -> bool {
        self.reset_code.is_some() && self.reset_code_expires.is_some()
    }

    /// Whether the pending reset code matches the candidate.
    pub fn reset_code_matches(&self, candidate: &str) -> bool {
        self.reset_code.as_deref() == Some(candidate)
    }

    /// Whether the pending reset code has passed its deadline.
    pub fn reset_code_expired(&self) -> bool {
        self.reset_code_expires.is_none_or(|deadline| Utc::now() > deadline)
    }

    /// Install a new password hash and clear the reset secret.
    pub fn complete_reset(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.reset_code = None;
        self.reset_code_expires = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn test_member() -> MemberAccount {
        MemberAccount::builder()
            .name("Jane")
            .email("jane@example.com")
            .password_hash("$2b$10$hash")
            .verification_code(secret::generate_numeric_code())
            .create()
            .unwrap()
    }

    #[test]
    fn new_member_is_unverified_with_six_digit_code() {
        let member = test_member();
        assert!(!member.is_verified);
        let code = member.verification_code.as_deref().unwrap();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        assert!(member.reset_code.is_none());
        assert!(member.reset_code_expires.is_none());
    }

    #[test]
    fn email_is_normalized() {
        let member = MemberAccount::builder()
            .name("Jane")
            .email("  Jane@Example.COM ")
            .password_hash("h")
            .verification_code("123456")
            .create()
            .unwrap();
        assert_eq!(member.email, "jane@example.com");
    }

    #[test]
    fn invalid_email_is_rejected() {
        let result = MemberAccount::builder()
            .name("Jane")
            .email("not-an-email")
            .password_hash("h")
            .verification_code("123456")
            .create();
        assert!(result.is_err());
    }

    #[test]
    fn malformed_verification_code_is_rejected() {
        let result = MemberAccount::builder()
            .name("Jane")
            .email("jane@example.com")
            .password_hash("h")
            .verification_code("12ab56")
            .create();
        assert!(result.is_err());
    }

    #[test]
    fn mark_verified_clears_code() {
        let mut member = test_member();
        member.mark_verified();
        assert!(member.is_verified);
        assert!(member.verification_code.is_none());
        assert!(!member.verification_code_matches("123456"));
    }

    #[test]
    fn replace_verification_code_invalidates_old() {
        let mut member = test_member();
        let old = member.verification_code.clone().unwrap();
        member.replace_verification_code("654321".to_string(), None);
        assert!(!member.verification_code_matches(&old));
        assert!(member.verification_code_matches("654321"));
    }

    #[test]
    fn verification_code_expiry_is_optional() {
        let mut member = test_member();
        assert!(!member.verification_code_expired());

        member.replace_verification_code("111111".to_string(), Some(Duration::minutes(-1)));
        assert!(member.verification_code_expired());
    }

    #[test]
    fn issue_reset_code_overwrites_previous() {
        let mut member = test_member();
        member.issue_reset_code("111111".to_string(), Duration::minutes(15));
        member.issue_reset_code("222222".to_string(), Duration::minutes(15));
        assert!(!member.reset_code_matches("111111"));
        assert!(member.reset_code_matches("222222"));
        assert!(member.has_active_reset());
    }

    #[test]
    fn reset_code_expires() {
        let mut member = test_member();
        assert!(!member.has_active_reset());

        member.issue_reset_code("333333".to_string(), Duration::minutes(15));
        assert!(!member.reset_code_expired());

        member.reset_code_expires = Some(Utc::now() - Duration::seconds(1));
        assert!(member.reset_code_expired());
    }

    #[test]
    fn complete_reset_clears_secret_and_swaps_hash() {
        let mut member = test_member();
        member.issue_reset_code("444444".to_string(), Duration::minutes(15));
        member.complete_reset("$2b$10$newhash".to_string());
        assert_eq!(member.password_hash, "$2b$10$newhash");
        assert!(!member.has_active_reset());
        assert!(member.reset_code.is_none());
        assert!(member.reset_code_expires.is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let member = test_member();
        let json = serde_json::to_string(&member).unwrap();
        let back: MemberAccount = serde_json::from_str(&json).unwrap();
        assert_eq!(member, back);
    }
}
