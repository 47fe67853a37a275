//! # Parish Configuration
//!
//! CLI-first configuration for the Parish identity service. Uses
//! `clap::Parser` for argument parsing with environment variable fallbacks,
//! and `bon::Builder` for ergonomic test construction without CLI/env
//! interference.
//!
//! ```no_run
//! use clap::Parser;
//! use parish_config::Cli;
//!
//! let cli = Cli::parse();
//! let config = cli.config;
//! config.validate().expect("invalid configuration");
//! ```
//!
//! ```no_run
//! use parish_config::Config;
//!
//! let config = Config::builder().dev_mode(true).frontend_url("http://localhost:3000").build();
//! ```

#![deny(unsafe_code)]

use std::net::SocketAddr;

use bon::Builder;
use clap::Parser;
use parish_types::error::{Error, Result};

/// Default HTTP listen address.
const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// Default frontend URL for email links.
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// Default log level filter string.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default email from address.
const DEFAULT_EMAIL_FROM_ADDRESS: &str = "noreply@parish.local";

/// Default email from display name.
const DEFAULT_EMAIL_FROM_NAME: &str = "Parish";

/// Default SMTP port.
const DEFAULT_EMAIL_PORT: u16 = 587;

/// Minimum accepted JWT secret length in bytes.
const MIN_JWT_SECRET_LEN: usize = 32;

/// Longest accepted verification-code TTL: one year, in minutes.
/// Values past this are configuration mistakes, and absurd magnitudes
/// overflow downstream duration arithmetic.
const MAX_VERIFICATION_CODE_TTL_MINUTES: i64 = 60 * 24 * 365;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// Automatically detect: JSON for non-TTY stdout, text otherwise.
    #[default]
    Auto,
    /// JSON structured logging (recommended for production).
    Json,
    /// Human-readable text format.
    Text,
}

/// Command-line interface for the Parish identity service.
#[derive(Debug, Parser)]
#[command(name = "parish-server")]
#[command(version)]
pub struct Cli {
    /// Server configuration (flattened so flags appear at top level).
    #[command(flatten)]
    pub config: Config,
}

/// Configuration for the Parish identity service.
///
/// All fields are configurable via CLI flags or environment variables.
/// Precedence: CLI arg > env var > default value.
///
/// Sensitive fields (`jwt_secret`, `email_password`) use `hide_env_values`
/// to prevent leaking secrets in `--help` output.
#[derive(Debug, Clone, Builder, Parser)]
#[command(name = "parish-server")]
#[command(version)]
#[builder(on(String, into))]
pub struct Config {
    // ── Server ───────────────────────────────────────────────────────
    /// HTTP bind address.
    #[arg(long = "listen", env = "PARISH__LISTEN", default_value = DEFAULT_LISTEN)]
    #[builder(default = default_listen())]
    pub listen: SocketAddr,

    /// Tracing-subscriber filter string (e.g., info, debug, trace).
    #[arg(long = "log-level", env = "PARISH__LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    #[builder(default = DEFAULT_LOG_LEVEL.to_string())]
    pub log_level: String,

    /// Log output format: auto, json, or text.
    #[arg(long = "log-format", env = "PARISH__LOG_FORMAT", value_enum, default_value = "auto")]
    #[builder(default)]
    pub log_format: LogFormat,

    // ── Sessions ─────────────────────────────────────────────────────
    /// HMAC secret for signing session tokens. Required outside dev mode.
    #[arg(long = "jwt-secret", env = "PARISH__JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Optional expiry for member verification codes, in minutes.
    /// When unset, verification codes never expire.
    #[arg(long = "verification-code-ttl-minutes", env = "PARISH__VERIFICATION_CODE_TTL_MINUTES")]
    pub verification_code_ttl_minutes: Option<i64>,

    // ── Email (SMTP) ─────────────────────────────────────────────────
    /// SMTP host. Empty string disables email.
    #[arg(long = "email-host", env = "PARISH__EMAIL_HOST", default_value = "")]
    #[builder(default)]
    pub email_host: String,

    /// SMTP port.
    #[arg(long = "email-port", env = "PARISH__EMAIL_PORT", default_value_t = DEFAULT_EMAIL_PORT)]
    #[builder(default = DEFAULT_EMAIL_PORT)]
    pub email_port: u16,

    /// SMTP username.
    #[arg(long = "email-username", env = "PARISH__EMAIL_USERNAME")]
    pub email_username: Option<String>,

    /// SMTP password.
    #[arg(long = "email-password", env = "PARISH__EMAIL_PASSWORD", hide_env_values = true)]
    pub email_password: Option<String>,

    /// From email address for outgoing messages.
    #[arg(long = "email-from-address", env = "PARISH__EMAIL_FROM_ADDRESS", default_value = DEFAULT_EMAIL_FROM_ADDRESS)]
    #[builder(default = DEFAULT_EMAIL_FROM_ADDRESS.to_string())]
    pub email_from_address: String,

    /// From display name for outgoing messages.
    #[arg(long = "email-from-name", env = "PARISH__EMAIL_FROM_NAME", default_value = DEFAULT_EMAIL_FROM_NAME)]
    #[builder(default = DEFAULT_EMAIL_FROM_NAME.to_string())]
    pub email_from_name: String,

    /// Allow insecure (unencrypted) SMTP connections.
    /// Only for local development with tools like Mailpit.
    #[arg(long = "email-insecure", env = "PARISH__EMAIL_INSECURE")]
    #[builder(default)]
    pub email_insecure: bool,

    // ── Frontend ─────────────────────────────────────────────────────
    /// Base URL for email links (admin onboarding).
    #[arg(long = "frontend-url", env = "PARISH__FRONTEND_URL", default_value = DEFAULT_FRONTEND_URL)]
    #[builder(default = DEFAULT_FRONTEND_URL.to_string())]
    pub frontend_url: String,

    // ── Mode Flags ───────────────────────────────────────────────────
    /// Force development mode: permits running without a JWT secret.
    /// No environment variable — this must be an explicit CLI choice.
    #[arg(long = "dev-mode")]
    #[builder(default)]
    pub dev_mode: bool,
}

fn default_listen() -> SocketAddr {
    #[allow(clippy::expect_used)]
    DEFAULT_LISTEN.parse().expect("valid default listen address")
}

impl Config {
    /// Validate cross-field business rules.
    ///
    /// Must be called after parsing and before using the config. Checks
    /// session secret requirements, frontend URL format, and SMTP
    /// credential pairing.
    pub fn validate(&self) -> Result<()> {
        // Validate session secret requirements
        match self.jwt_secret.as_deref() {
            Some(secret) if secret.len() < MIN_JWT_SECRET_LEN => {
                return Err(Error::config(format!(
                    "--jwt-secret must be at least {MIN_JWT_SECRET_LEN} bytes"
                )));
            },
            None if !self.dev_mode => {
                return Err(Error::config("--jwt-secret is required outside --dev-mode"));
            },
            _ => {},
        }

        if let Some(ttl) = self.verification_code_ttl_minutes {
            if ttl <= 0 {
                return Err(Error::config("--verification-code-ttl-minutes must be positive"));
            }
            if ttl > MAX_VERIFICATION_CODE_TTL_MINUTES {
                return Err(Error::config(format!(
                    "--verification-code-ttl-minutes must be at most \
                     {MAX_VERIFICATION_CODE_TTL_MINUTES} (one year)"
                )));
            }
        }

        // Validate frontend URL format
        if !self.frontend_url.starts_with("http://") && !self.frontend_url.starts_with("https://") {
            return Err(Error::config("--frontend-url must start with http:// or https://"));
        }

        if self.frontend_url.ends_with('/') {
            return Err(Error::config("--frontend-url must not end with a trailing slash"));
        }

        if self.frontend_url.contains("localhost") || self.frontend_url.contains("127.0.0.1") {
            tracing::warn!(
                "--frontend-url contains localhost — this should only be used in development"
            );
        }

        // SMTP credentials come as a pair or not at all
        if self.email_username.is_some() != self.email_password.is_some() {
            return Err(Error::config(
                "--email-username and --email-password must be provided together",
            ));
        }

        Ok(())
    }

    /// Returns whether email sending is enabled.
    ///
    /// Email is disabled when `email_host` is empty (the default).
    pub fn is_email_enabled(&self) -> bool {
        !self.email_host.is_empty()
    }

    /// Returns whether dev-mode is enabled.
    pub fn is_dev_mode(&self) -> bool {
        self.dev_mode
    }
}
