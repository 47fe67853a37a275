pub mod admin;
pub mod member;
pub mod role;
pub mod secret;

pub use admin::AdminAccount;
pub use member::MemberAccount;
pub use role::{AccountStatus, Role};

use crate::error::{Error, Result};

/// Normalize an email address for use as a unique key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal structural check on an email address.
///
/// Full RFC 5322 validation is deliberately out of scope; the verification
/// code loop is what actually proves the address works.
pub fn validate_email(email: &str) -> Result<()> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(Error::validation("Invalid email address"));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || email.contains(' ') {
        return Err(Error::validation("Invalid email address"));
    }
    Ok(())
}
