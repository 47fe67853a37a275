//! Credential lifecycle state machines.
//!
//! Each flow reads the current account record, checks the presented secret
//! against it, and commits the transition. Transitions that consume a
//! single-use secret go through the repository's conditional swap so a
//! concurrent attempt with the same secret cannot also succeed.

pub mod admin;
pub mod member;

pub use admin::{AdminCreationOutcome, AdminLifecycle, AdminSession};
pub use member::{MemberLifecycle, MemberSession, RegistrationOutcome};
