use std::sync::Arc;

use chrono::Duration;
use parish_storage::StorageBackend;
use parish_types::{
    MemberAccount,
    entities::secret,
    error::{Error, Result},
};

use crate::{
    email::{EmailService, EmailTemplate, PasswordResetEmailTemplate, VerificationEmailTemplate},
    password::PasswordHasher,
    repository::MemberRepository,
    session::SessionIssuer,
};

/// Reset codes are valid for 15 minutes.
const RESET_CODE_TTL_MINUTES: i64 = 15;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

/// Result of a registration attempt.
///
/// `notified` is false when the account was created but the verification
/// email could not be delivered; the caller reports degraded success and
/// points the member at the resend endpoint.
#[derive(Debug)]
pub struct RegistrationOutcome {
    pub member: MemberAccount,
    pub notified: bool,
}

/// A signed-in member.
#[derive(Debug)]
pub struct MemberSession {
    pub token: String,
    pub member: MemberAccount,
}

/// Member registration, verification, login and password-reset flows.
pub struct MemberLifecycle<S: StorageBackend> {
    members: MemberRepository<S>,
    hasher: PasswordHasher,
    sessions: SessionIssuer,
    email: Arc<EmailService>,
    /// Optional verification-code expiry; None keeps codes valid forever.
    verification_code_ttl: Option<Duration>,
}

impl<S: StorageBackend> MemberLifecycle<S> {
    pub fn new(
        members: MemberRepository<S>,
        hasher: PasswordHasher,
        sessions: SessionIssuer,
        email: Arc<EmailService>,
        verification_code_ttl: Option<Duration>,
    ) -> Self {
        Self { members, hasher, sessions, email, verification_code_ttl }
    }

    /// Register a new member.
    ///
    /// The record is created unverified with a fresh 6-digit code. Email
    /// delivery is best effort: a failed send never rolls back the account.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<RegistrationOutcome> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(Error::validation("All fields are required."));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::validation("Password must be at least 6 characters"));
        }

        let code = secret::generate_numeric_code();
        let password_hash = self.hasher.hash(password)?;
        let member = MemberAccount::builder()
            .name(name.trim())
            .email(email)
            .password_hash(password_hash)
            .verification_code(code.clone())
            .maybe_verification_code_expires(
                self.verification_code_ttl.map(|ttl| chrono::Utc::now() + ttl),
            )
            .create()?;

        self.members.create(&member).await?;
        tracing::info!(email = %member.email, "Member registered");

        let notified = self.send_verification_code(&member.email, &code).await;
        Ok(RegistrationOutcome { member, notified })
    }

    /// Prove email ownership with the pending verification code.
    pub async fn verify(&self, email: &str, code: &str) -> Result<MemberAccount> {
        let Some(member) = self.members.get(email).await? else {
            return Err(Error::not_found("Member not found."));
        };
        if member.is_verified {
            return Err(Error::already_verified("Already verified."));
        }
        if !member.verification_code_matches(code) {
            return Err(Error::invalid_code("Invalid code."));
        }
        if member.verification_code_expired() {
            return Err(Error::expired("Code expired."));
        }

        let mut verified = member.clone();
        verified.mark_verified();
        if !self.members.swap(&member, &verified).await? {
            // Lost a race with another verify; the record moved under us
            return Err(Error::already_verified("Already verified."));
        }
        tracing::info!(email = %verified.email, "Member email verified");
        Ok(verified)
    }

    /// Authenticate a verified member and issue a 7-day session.
    ///
    /// Account existence is never confirmed: a missing record and a wrong
    /// password produce the identical error.
    pub async fn login(&self, email: &str, password: &str) -> Result<MemberSession> {
        let Some(member) = self.members.get(email).await? else {
            return Err(Error::auth("Invalid credentials."));
        };
        if !member.is_verified {
            return Err(Error::forbidden("Please verify your email before logging in."));
        }
        if !self.hasher.verify(password, &member.password_hash)? {
            return Err(Error::auth("Invalid credentials."));
        }

        let token = self.sessions.issue_member(&member)?;
        Ok(MemberSession { token, member })
    }

    /// Replace the pending verification code and re-send it.
    ///
    /// Unlike registration, a delivery failure here is surfaced: no state
    /// was created that the member could fall back on.
    pub async fn resend_code(&self, email: &str) -> Result<()> {
        let Some(member) = self.members.get(email).await? else {
            return Err(Error::not_found("Member not found."));
        };
        if member.is_verified {
            return Err(Error::already_verified("Already verified."));
        }

        let code = secret::generate_numeric_code();
        let mut updated = member.clone();
        updated.replace_verification_code(code.clone(), self.verification_code_ttl);
        self.members.update(&updated).await?;

        if !self.send_verification_code(&updated.email, &code).await {
            return Err(Error::internal("Failed to send verification email"));
        }
        Ok(())
    }

    /// Issue a 15-minute reset code and email it.
    ///
    /// Issuing always overwrites any previous code, so only the newest one
    /// can complete a reset.
    pub async fn send_reset_code(&self, email: &str) -> Result<()> {
        let Some(member) = self.members.get(email).await? else {
            return Err(Error::not_found("Member not found."));
        };

        let code = secret::generate_numeric_code();
        let mut updated = member.clone();
        updated.issue_reset_code(code.clone(), Duration::minutes(RESET_CODE_TTL_MINUTES));
        self.members.update(&updated).await?;

        let template = PasswordResetEmailTemplate { code: &code };
        let sent = self
            .email
            .send_email(
                &updated.email,
                &template.subject(),
                &template.body_html(),
                &template.body_text(),
            )
            .await;
        if let Err(e) = sent {
            tracing::error!(email = %updated.email, error = %e, "Failed to send reset code");
            return Err(Error::internal("Failed to send reset email"));
        }
        Ok(())
    }

    /// Check a reset code without consuming it.
    pub async fn verify_reset_code(&self, email: &str, code: &str) -> Result<()> {
        let member = self.members.get(email).await?;
        self.check_reset_code(member.as_ref(), code).map(|_| ())
    }

    /// Complete a password reset: consume the code and install the new hash.
    pub async fn reset_password(&self, email: &str, code: &str, new_password: &str) -> Result<()> {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(Error::validation("Password must be at least 6 characters"));
        }

        let stored = self.members.get(email).await?;
        let member = self.check_reset_code(stored.as_ref(), code)?;

        let mut updated = member.clone();
        updated.complete_reset(self.hasher.hash(new_password)?);
        if !self.members.swap(member, &updated).await? {
            // The code was consumed (or reissued) between check and commit
            return Err(Error::no_active_reset("No reset code found."));
        }
        tracing::info!(email = %updated.email, "Member password reset");
        Ok(())
    }

    fn check_reset_code<'a>(
        &self,
        member: Option<&'a MemberAccount>,
        code: &str,
    ) -> Result<&'a MemberAccount> {
        let Some(member) = member else {
            return Err(Error::no_active_reset("No reset code found."));
        };
        if !member.has_active_reset() {
            return Err(Error::no_active_reset("No reset code found."));
        }
        if !member.reset_code_matches(code) {
            return Err(Error::invalid_code("Invalid code."));
        }
        if member.reset_code_expired() {
            return Err(Error::expired("Code expired."));
        }
        Ok(member)
    }

    async fn send_verification_code(&self, email: &str, code: &str) -> bool {
        let template = VerificationEmailTemplate { code };
        match self
            .email
            .send_email(email, &template.subject(), &template.body_html(), &template.body_text())
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(email = %email, error = %e, "Failed to send verification code");
                false
            },
        }
    }
}
