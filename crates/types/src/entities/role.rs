use serde::{Deserialize, Serialize};

/// Account roles recognized by the authorization gate.
///
/// Admin accounts carry one of the three privileged roles; member accounts
/// always carry [`Role::Member`]. There is no hierarchy — every protected
/// operation declares an explicit allow-list of roles.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    /// Full control, including admin account management
    Superadmin,
    /// Content management across all resources
    Supereditor,
    /// Content management for assigned resources
    Editor,
    /// Public self-registered site user
    Member,
}

impl Role {
    /// Whether this role may be assigned to an admin account.
    pub fn is_admin(self) -> bool {
        !matches!(self, Role::Member)
    }
}

/// Admin account lifecycle status.
///
/// Inactive admins keep their record (nothing hard-deletes) but cannot log in.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}
