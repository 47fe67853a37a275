use bon::bon;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountStatus, Role, normalize_email, secret, validate_email};
use crate::error::{Error, Result};

/// One-time token validity window for admin onboarding.
const ONE_TIME_TOKEN_TTL_MINUTES: i64 = 30;

/// Privileged administrator account.
///
/// Created only by a superadmin. Starts life "invited": the record carries a
/// single-use onboarding token and the hash of a default password, and
/// `must_change_password` stays true until the admin picks their own password.
/// An expired invitation is terminal — there is no reissue path short of the
/// superadmin starting over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminAccount {
    /// Unique key within the admin collection (lowercased, trimmed)
    pub email: String,

    /// Display name
    pub name: String,

    /// One-way bcrypt hash of the current (initially default) password
    pub password_hash: String,

    /// Privileged role; never [`Role::Member`]
    pub role: Role,

    /// Active accounts may log in; inactive ones are refused
    pub status: AccountStatus,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// Pending single-use onboarding token, cleared on first login
    pub one_time_token: Option<String>,

    /// Onboarding token validity deadline
    pub one_time_token_expires: Option<DateTime<Utc>>,

    /// True from creation until a successful change-password call
    pub must_change_password: bool,
}

#[bon]
impl AdminAccount {
    /// Create a freshly invited admin account.
    ///
    /// `one_time_token` must come from [`secret::generate_one_time_token`];
    /// its expiry is fixed at creation + 30 minutes.
    #[builder(on(String, into), finish_fn = create)]
    pub fn new(
        email: String,
        name: String,
        password_hash: String,
        role: Role,
        #[builder(default)] status: AccountStatus,
        one_time_token: String,
    ) -> Result<Self> {
        let email = normalize_email(&email);
        validate_email(&email)?;
        if !role.is_admin() {
            return Err(Error::validation("Admin role must be superadmin, supereditor or editor"));
        }
        secret::validate_token_format(&one_time_token)?;
        Ok(Self {
            email,
            name,
            password_hash,
            role,
            status,
            created_at: Utc::now(),
            one_time_token: Some(one_time_token),
            one_time_token_expires: Some(
                Utc::now() + Duration::minutes(ONE_TIME_TOKEN_TTL_MINUTES),
            ),
            must_change_password: true,
        })
    }

    /// Whether the account may authenticate at all.
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Whether the pending onboarding token matches the candidate.
    pub fn one_time_token_matches(&self, candidate: &str) -> bool {
        self.one_time_token.as_deref() == Some(candidate)
    }

    /// Whether the onboarding token has passed its deadline.
    pub fn one_time_token_expired(&self) -> bool {
        self.one_time_token_expires.is_none_or(|deadline| Utc::now() > deadline)
    }

    /// Clear the onboarding token (single-use enforcement).
    pub fn consume_one_time_token(&mut self) {
        self.one_time_token = None;
        self.one_time_token_expires = None;
    }

    /// Install a self-chosen password hash and clear the change obligation.
    pub fn set_password(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.must_change_password = false;
    }
}
