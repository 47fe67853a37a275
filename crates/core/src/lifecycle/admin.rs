use std::sync::Arc;

use parish_storage::StorageBackend;
use parish_types::{
    AccountStatus, AdminAccount, Role,
    entities::secret,
    error::{Error, Result},
};

use crate::{
    access::{self, Operation},
    email::{AdminInvitationEmailTemplate, EmailService, EmailTemplate},
    password::PasswordHasher,
    repository::AdminRepository,
    session::SessionIssuer,
};

/// Result of inviting a new admin.
///
/// `one_time_link` is populated only when the invitation email failed, so
/// the superadmin can hand the link over manually. The default password is
/// always echoed back by the wire layer regardless of delivery.
#[derive(Debug)]
pub struct AdminCreationOutcome {
    pub admin: AdminAccount,
    pub one_time_link: Option<String>,
    pub notified: bool,
}

/// A signed-in admin.
#[derive(Debug)]
pub struct AdminSession {
    pub token: String,
    pub admin: AdminAccount,
}

/// Admin invitation, onboarding, login and password management flows.
pub struct AdminLifecycle<S: StorageBackend> {
    admins: AdminRepository<S>,
    hasher: PasswordHasher,
    sessions: SessionIssuer,
    email: Arc<EmailService>,
    /// Base URL the onboarding link points at.
    frontend_url: String,
}

impl<S: StorageBackend> AdminLifecycle<S> {
    pub fn new(
        admins: AdminRepository<S>,
        hasher: PasswordHasher,
        sessions: SessionIssuer,
        email: Arc<EmailService>,
        frontend_url: String,
    ) -> Self {
        Self { admins, hasher, sessions, email, frontend_url }
    }

    /// Invite a new admin. Superadmin only.
    ///
    /// Creates the record with a 30-minute single-use token and the hash of
    /// the chosen default password. Email delivery is best effort: on
    /// failure the onboarding link is returned for manual distribution, an
    /// explicit availability-over-confidentiality trade.
    pub async fn create_admin(
        &self,
        creator_role: Role,
        email: &str,
        name: &str,
        role: Role,
        status: AccountStatus,
        default_password: &str,
    ) -> Result<AdminCreationOutcome> {
        access::require(Operation::CreateAdmin, creator_role)?;
        if email.trim().is_empty() || default_password.is_empty() {
            return Err(Error::validation("Email and password required"));
        }

        let token = secret::generate_one_time_token();
        let password_hash = self.hasher.hash(default_password)?;
        let admin = AdminAccount::builder()
            .email(email)
            .name(name)
            .password_hash(password_hash)
            .role(role)
            .status(status)
            .one_time_token(token.clone())
            .create()?;

        self.admins.create(&admin).await?;
        tracing::info!(email = %admin.email, role = %admin.role, "Admin invited");

        let link = self.onboarding_link(&admin.email, &token);
        let template = AdminInvitationEmailTemplate {
            name: &admin.name,
            default_password,
            onboarding_url: &link,
        };
        let sent = self
            .email
            .send_email(
                &admin.email,
                &template.subject(),
                &template.body_html(),
                &template.body_text(),
            )
            .await;

        match sent {
            Ok(()) => Ok(AdminCreationOutcome { admin, one_time_link: None, notified: true }),
            Err(e) => {
                tracing::warn!(email = %admin.email, error = %e, "Invitation email failed");
                Ok(AdminCreationOutcome { admin, one_time_link: Some(link), notified: false })
            },
        }
    }

    /// First login with the invitation token and default password.
    ///
    /// On success the token is cleared in the same conditional swap that
    /// commits the login, so a second attempt with the same token fails
    /// even under concurrency. The issued session still carries
    /// `must_change_password`.
    pub async fn onboarding_login(
        &self,
        email: &str,
        password: &str,
        token: &str,
    ) -> Result<AdminSession> {
        let Some(admin) = self.admins.get(email).await? else {
            return Err(Error::invalid_token("Invalid or expired invitation link."));
        };
        if !admin.one_time_token_matches(token) {
            return Err(Error::invalid_token("Invalid or expired invitation link."));
        }
        if admin.one_time_token_expired() {
            return Err(Error::expired("Invitation link has expired."));
        }
        if !self.hasher.verify(password, &admin.password_hash)? {
            return Err(Error::auth("Incorrect default password."));
        }

        let mut onboarded = admin.clone();
        onboarded.consume_one_time_token();
        if !self.admins.swap(&admin, &onboarded).await? {
            // A concurrent attempt consumed the token first
            return Err(Error::invalid_token("Invalid or expired invitation link."));
        }

        tracing::info!(email = %onboarded.email, "Admin onboarded");
        let session_token = self.sessions.issue_admin(&onboarded)?;
        Ok(AdminSession { token: session_token, admin: onboarded })
    }

    /// Regular admin login with a self-chosen password.
    ///
    /// Existence is hidden; an inactive account is refused after the
    /// credentials check out.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminSession> {
        let Some(admin) = self.admins.get(email).await? else {
            return Err(Error::auth("Invalid credentials"));
        };
        if !self.hasher.verify(password, &admin.password_hash)? {
            return Err(Error::auth("Invalid credentials"));
        }
        if !admin.is_active() {
            return Err(Error::forbidden("Account inactive"));
        }

        let token = self.sessions.issue_admin(&admin)?;
        Ok(AdminSession { token, admin })
    }

    /// Change one's own password, clearing the change obligation.
    pub async fn change_password(
        &self,
        role: Role,
        email: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        access::require(Operation::ChangePassword, role)?;
        if old_password.is_empty() || new_password.is_empty() {
            return Err(Error::validation("Both old and new passwords are required."));
        }

        let Some(admin) = self.admins.get(email).await? else {
            return Err(Error::not_found("User not found."));
        };
        if !self.hasher.verify(old_password, &admin.password_hash)? {
            return Err(Error::auth("Old password is incorrect."));
        }

        let mut updated = admin;
        updated.set_password(self.hasher.hash(new_password)?);
        self.admins.update(&updated).await?;
        tracing::info!(email = %updated.email, "Admin password changed");
        Ok(())
    }

    /// List all admin accounts. Superadmin only.
    pub async fn list(&self, role: Role) -> Result<Vec<AdminAccount>> {
        access::require(Operation::ListAdmins, role)?;
        self.admins.list().await
    }

    /// Fetch one's own account.
    pub async fn me(&self, role: Role, email: &str) -> Result<AdminAccount> {
        access::require(Operation::ViewOwnProfile, role)?;
        self.admins.get(email).await?.ok_or_else(|| Error::not_found("User not found."))
    }

    fn onboarding_link(&self, email: &str, token: &str) -> String {
        format!(
            "{}/admin/login?token={token}&email={}",
            self.frontend_url,
            percent_encode(email)
        )
    }
}

/// Percent-encode everything outside the URL-unreserved set.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            },
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use chrono::{Duration, Utc};
    use parish_storage::Backend;

    use super::*;
    use crate::email::MockEmailSender;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn lifecycle(backend: Backend, email_fails: bool) -> AdminLifecycle<Backend> {
        let sender: Box<dyn crate::email::EmailSender> = if email_fails {
            Box::new(MockEmailSender::new_failing())
        } else {
            Box::new(MockEmailSender::new())
        };
        AdminLifecycle::new(
            AdminRepository::new(backend),
            PasswordHasher::with_cost(4),
            SessionIssuer::new(SECRET),
            Arc::new(EmailService::new(sender)),
            "https://admin.example.org".to_string(),
        )
    }

    async fn invite(lifecycle: &AdminLifecycle<Backend>, email: &str) -> AdminCreationOutcome {
        lifecycle
            .create_admin(
                Role::Superadmin,
                email,
                "Bob",
                Role::Editor,
                AccountStatus::Active,
                "Chang3me!",
            )
            .await
            .unwrap()
    }

    async fn stored_token(backend: &Backend, email: &str) -> String {
        AdminRepository::new(backend.clone()).get(email).await.unwrap().unwrap().one_time_token.unwrap()
    }

    #[tokio::test]
    async fn create_admin_requires_superadmin() {
        let lifecycle = lifecycle(Backend::memory(), false);
        for role in [Role::Supereditor, Role::Editor, Role::Member] {
            let err = lifecycle
                .create_admin(
                    role,
                    "bob@x.com",
                    "Bob",
                    Role::Editor,
                    AccountStatus::Active,
                    "Chang3me!",
                )
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Forbidden { .. }));
        }
    }

    #[tokio::test]
    async fn create_admin_invites_with_token_and_email() {
        let backend = Backend::memory();
        let lifecycle = lifecycle(backend.clone(), false);
        let outcome = invite(&lifecycle, "bob@x.com").await;

        assert!(outcome.notified);
        assert!(outcome.one_time_link.is_none());
        assert!(outcome.admin.must_change_password);
        assert_eq!(stored_token(&backend, "bob@x.com").await.len(), 64);
    }

    #[tokio::test]
    async fn create_admin_returns_link_when_email_fails() {
        let backend = Backend::memory();
        let lifecycle = lifecycle(backend.clone(), true);
        let outcome = invite(&lifecycle, "bob@x.com").await;

        assert!(!outcome.notified);
        let link = outcome.one_time_link.unwrap();
        let token = stored_token(&backend, "bob@x.com").await;
        assert!(link.contains(&token));
        assert!(link.contains("email=bob%40x.com"));
    }

    #[tokio::test]
    async fn duplicate_admin_email_conflicts() {
        let lifecycle = lifecycle(Backend::memory(), false);
        invite(&lifecycle, "bob@x.com").await;
        let err = lifecycle
            .create_admin(
                Role::Superadmin,
                "bob@x.com",
                "Bob",
                Role::Editor,
                AccountStatus::Active,
                "Chang3me!",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn onboarding_login_is_single_use() {
        let backend = Backend::memory();
        let lifecycle = lifecycle(backend.clone(), false);
        invite(&lifecycle, "bob@x.com").await;
        let token = stored_token(&backend, "bob@x.com").await;

        let session = lifecycle.onboarding_login("bob@x.com", "Chang3me!", &token).await.unwrap();
        assert!(session.admin.one_time_token.is_none());
        assert!(session.admin.must_change_password);

        let err =
            lifecycle.onboarding_login("bob@x.com", "Chang3me!", &token).await.unwrap_err();
        assert_eq!(err.message(), "Invalid or expired invitation link.");
    }

    #[tokio::test]
    async fn onboarding_login_rejects_bad_inputs() {
        let backend = Backend::memory();
        let lifecycle = lifecycle(backend.clone(), false);
        invite(&lifecycle, "bob@x.com").await;
        let token = stored_token(&backend, "bob@x.com").await;

        let err = lifecycle
            .onboarding_login("bob@x.com", "Chang3me!", &secret::generate_one_time_token())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Invalid or expired invitation link.");

        let err = lifecycle.onboarding_login("bob@x.com", "wrong", &token).await.unwrap_err();
        assert_eq!(err.message(), "Incorrect default password.");
        assert_eq!(err.status_code(), 401);

        let err = lifecycle
            .onboarding_login("nobody@x.com", "Chang3me!", &token)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Invalid or expired invitation link.");
    }

    #[tokio::test]
    async fn expired_invitation_is_rejected() {
        let backend = Backend::memory();
        let lifecycle = lifecycle(backend.clone(), false);
        invite(&lifecycle, "bob@x.com").await;

        let repo = AdminRepository::new(backend.clone());
        let mut admin = repo.get("bob@x.com").await.unwrap().unwrap();
        let token = admin.one_time_token.clone().unwrap();
        admin.one_time_token_expires = Some(Utc::now() - Duration::seconds(1));
        repo.update(&admin).await.unwrap();

        let err = lifecycle.onboarding_login("bob@x.com", "Chang3me!", &token).await.unwrap_err();
        assert_eq!(err.message(), "Invitation link has expired.");
    }

    #[tokio::test]
    async fn login_and_change_password_flow() {
        let backend = Backend::memory();
        let lifecycle = lifecycle(backend.clone(), false);
        invite(&lifecycle, "bob@x.com").await;
        let token = stored_token(&backend, "bob@x.com").await;
        lifecycle.onboarding_login("bob@x.com", "Chang3me!", &token).await.unwrap();

        lifecycle
            .change_password(Role::Editor, "bob@x.com", "Chang3me!", "MyOwnPass1!")
            .await
            .unwrap();

        let session = lifecycle.login("bob@x.com", "MyOwnPass1!").await.unwrap();
        assert!(!session.admin.must_change_password);

        let err = lifecycle.login("bob@x.com", "Chang3me!").await.unwrap_err();
        assert_eq!(err.message(), "Invalid credentials");

        let err = lifecycle
            .change_password(Role::Editor, "bob@x.com", "Chang3me!", "Other1!!")
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Old password is incorrect.");
    }

    #[tokio::test]
    async fn inactive_admin_cannot_login() {
        let backend = Backend::memory();
        let lifecycle = lifecycle(backend.clone(), false);
        invite(&lifecycle, "bob@x.com").await;

        let repo = AdminRepository::new(backend.clone());
        let mut admin = repo.get("bob@x.com").await.unwrap().unwrap();
        admin.status = AccountStatus::Inactive;
        repo.update(&admin).await.unwrap();

        let err = lifecycle.login("bob@x.com", "Chang3me!").await.unwrap_err();
        assert_eq!(err.message(), "Account inactive");
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn list_is_superadmin_only() {
        let lifecycle = lifecycle(Backend::memory(), false);
        invite(&lifecycle, "bob@x.com").await;
        invite(&lifecycle, "alice@x.com").await;

        let all = lifecycle.list(Role::Superadmin).await.unwrap();
        assert_eq!(all.len(), 2);

        let err = lifecycle.list(Role::Editor).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));
    }

    #[tokio::test]
    async fn me_returns_own_account() {
        let lifecycle = lifecycle(Backend::memory(), false);
        invite(&lifecycle, "bob@x.com").await;

        let admin = lifecycle.me(Role::Editor, "bob@x.com").await.unwrap();
        assert_eq!(admin.email, "bob@x.com");

        let err = lifecycle.me(Role::Member, "bob@x.com").await.unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));
    }

    #[test]
    fn percent_encoding_covers_reserved_characters() {
        assert_eq!(percent_encode("bob@x.com"), "bob%40x.com");
        assert_eq!(percent_encode("a+b@x.com"), "a%2Bb%40x.com");
        assert_eq!(percent_encode("plain"), "plain");
    }
}
