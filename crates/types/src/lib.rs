//! # Parish Types
//!
//! Shared type definitions for the Parish identity service.
//!
//! This crate holds the account entities, wire DTOs and the common error
//! type used across the workspace, ensuring a single source of truth and
//! preventing circular dependencies.
//!
//! Entity types with validation use [`bon`](https://docs.rs/bon) fallible
//! builders: `#[builder]` on the `new()` constructor, finished with
//! `.create()`, returning `Result<Self>`.

#![deny(unsafe_code)]

pub mod dto;
pub mod entities;
pub mod error;

pub use entities::{AccountStatus, AdminAccount, MemberAccount, Role};
pub use error::{Error, Result};
