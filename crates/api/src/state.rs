use std::sync::Arc;

use chrono::Duration;
use parish_config::Config;
use parish_core::{
    AdminLifecycle, AdminRepository, MemberLifecycle, MemberRepository, PasswordHasher,
    SessionIssuer, email::EmailService,
};
use parish_storage::Backend;
use parish_types::error::Result;

/// Shared application state handed to every handler.
///
/// Everything inside is cheap to clone: the lifecycles sit behind `Arc` and
/// the backend is itself a shared handle.
#[derive(Clone)]
pub struct AppState {
    members: Arc<MemberLifecycle<Backend>>,
    admins: Arc<AdminLifecycle<Backend>>,
    sessions: SessionIssuer,
    storage: Backend,
}

impl AppState {
    /// Wire up the state from validated configuration.
    ///
    /// In dev mode without a configured JWT secret, an ephemeral random
    /// secret is generated; sessions then die with the process.
    pub fn new(config: &Config, storage: Backend, email: EmailService) -> Result<Self> {
        let secret = match &config.jwt_secret {
            Some(secret) => secret.clone().into_bytes(),
            None => {
                tracing::warn!("No JWT secret configured; using an ephemeral dev-mode secret");
                let bytes: [u8; 32] = rand::random();
                bytes.to_vec()
            },
        };
        Ok(Self::assemble(
            &secret,
            PasswordHasher::new(),
            storage,
            email,
            config.verification_code_ttl_minutes.map(Duration::minutes),
            config.frontend_url.clone(),
        ))
    }

    /// Test constructor: fixed secret and cheap password hashing.
    pub fn new_test(storage: Backend, email: EmailService) -> Self {
        Self::assemble(
            b"test-secret-0123456789abcdef0123456789",
            PasswordHasher::with_cost(4),
            storage,
            email,
            None,
            "http://localhost:3000".to_string(),
        )
    }

    fn assemble(
        secret: &[u8],
        hasher: PasswordHasher,
        storage: Backend,
        email: EmailService,
        verification_code_ttl: Option<Duration>,
        frontend_url: String,
    ) -> Self {
        let sessions = SessionIssuer::new(secret);
        let email = Arc::new(email);

        let members = MemberLifecycle::new(
            MemberRepository::new(storage.clone()),
            hasher,
            sessions.clone(),
            Arc::clone(&email),
            verification_code_ttl,
        );
        let admins = AdminLifecycle::new(
            AdminRepository::new(storage.clone()),
            hasher,
            sessions.clone(),
            email,
            frontend_url,
        );

        Self { members: Arc::new(members), admins: Arc::new(admins), sessions, storage }
    }

    pub fn members(&self) -> &MemberLifecycle<Backend> {
        &self.members
    }

    pub fn admins(&self) -> &AdminLifecycle<Backend> {
        &self.admins
    }

    pub fn sessions(&self) -> &SessionIssuer {
        &self.sessions
    }

    pub fn storage(&self) -> &Backend {
        &self.storage
    }
}
