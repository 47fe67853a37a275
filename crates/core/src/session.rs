//! Session token issuance and verification.
//!
//! Sessions are stateless HS256 JWTs signed with the configured secret.
//! Member sessions live 7 days; admin sessions 2 hours. Verification is a
//! pure function from token to [`AuthContext`] — handlers receive the
//! result explicitly instead of reading ambient request state.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use parish_types::{
    AdminAccount, MemberAccount, Role,
    error::{Error, Result},
};
use serde::{Deserialize, Serialize};

/// Member session lifetime.
const MEMBER_SESSION_TTL_DAYS: i64 = 7;

/// Admin session lifetime.
const ADMIN_SESSION_TTL_HOURS: i64 = 2;

/// JWT claims for a signed-in identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the account email
    pub sub: String,
    /// Display name
    pub name: String,
    /// Account role (lowercase)
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Set on onboarding sessions until the admin picks a password
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub must_change_password: bool,
}

/// Verified identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub must_change_password: bool,
}

/// Signs and verifies session tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer").finish_non_exhaustive()
    }
}

impl SessionIssuer {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a 7-day member session.
    pub fn issue_member(&self, member: &MemberAccount) -> Result<String> {
        self.sign(
            member.email.clone(),
            member.name.clone(),
            Role::Member,
            Duration::days(MEMBER_SESSION_TTL_DAYS),
            false,
        )
    }

    /// Issue a 2-hour admin session.
    ///
    /// The `must_change_password` flag is carried into the claims so the
    /// surrounding system can steer a fresh onboardee to the password form.
    pub fn issue_admin(&self, admin: &AdminAccount) -> Result<String> {
        self.sign(
            admin.email.clone(),
            admin.name.clone(),
            admin.role,
            Duration::hours(ADMIN_SESSION_TTL_HOURS),
            admin.must_change_password,
        )
    }

    fn sign(
        &self,
        email: String,
        name: String,
        role: Role,
        ttl: Duration,
        must_change_password: bool,
    ) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: email,
            name,
            role,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            must_change_password,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::internal(format!("Failed to sign session token: {e}")))
    }

    /// Verify a session token and extract the identity it asserts.
    ///
    /// Bad signature, expired token and malformed token all collapse into
    /// the same `Unauthenticated` error; callers never learn which.
    pub fn verify(&self, token: &str) -> Result<AuthContext> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|_| Error::auth("Invalid or expired token."))?;
        let claims = data.claims;
        Ok(AuthContext {
            email: claims.sub,
            name: claims.name,
            role: claims.role,
            must_change_password: claims.must_change_password,
        })
    }
}
