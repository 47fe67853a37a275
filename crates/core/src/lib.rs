#![deny(unsafe_code)]

//! # Parish Core
//!
//! Core business logic for the Parish identity service.
//!
//! ## Imports
//!
//! Import types from their source crates:
//! - Entity types: `parish_types::entities`
//! - DTOs: `parish_types::dto`
//! - Errors: `parish_types::Error`
//! - Config: `parish_config::Config`

pub mod access;
pub mod email;
pub mod lifecycle;
pub mod logging;
pub mod password;
pub mod repository;
pub mod session;

pub use access::Operation;
pub use email::{
    AdminInvitationEmailTemplate, EmailSender, EmailService, EmailTemplate, MockEmailSender,
    PasswordResetEmailTemplate, SmtpEmailService, VerificationEmailTemplate,
    resolve_email_service,
};
pub use lifecycle::{
    AdminCreationOutcome, AdminLifecycle, AdminSession, MemberLifecycle, MemberSession,
    RegistrationOutcome,
};
pub use password::PasswordHasher;
pub use repository::{AdminRepository, MemberRepository};
pub use session::{AuthContext, SessionClaims, SessionIssuer};
