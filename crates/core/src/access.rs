//! Role-gated authorization.
//!
//! Every protected operation declares an explicit allow-list here. There is
//! no role hierarchy: an operation permits exactly the roles its entry
//! names, and similar-looking operations may legitimately differ. Handlers
//! call [`require`] once with the verified role; the table is the single
//! place the route-to-role mapping lives.

use parish_types::{
    Role,
    error::{Error, Result},
};

/// Protected operations of the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create an invited admin account.
    CreateAdmin,
    /// List all admin accounts.
    ListAdmins,
    /// Change one's own admin password.
    ChangePassword,
    /// Read one's own admin profile.
    ViewOwnProfile,
}

impl Operation {
    /// The roles permitted to perform this operation.
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Self::CreateAdmin | Self::ListAdmins => &[Role::Superadmin],
            Self::ChangePassword | Self::ViewOwnProfile => {
                &[Role::Superadmin, Role::Supereditor, Role::Editor]
            },
        }
    }
}

/// Gate an operation on the caller's role.
pub fn require(operation: Operation, role: Role) -> Result<()> {
    if operation.allowed_roles().contains(&role) {
        Ok(())
    } else {
        Err(Error::forbidden("Forbidden"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn only_superadmin_creates_admins() {
        assert!(require(Operation::CreateAdmin, Role::Superadmin).is_ok());
        assert!(require(Operation::CreateAdmin, Role::Supereditor).is_err());
        assert!(require(Operation::CreateAdmin, Role::Editor).is_err());
        assert!(require(Operation::CreateAdmin, Role::Member).is_err());
    }

    #[test]
    fn only_superadmin_lists_admins() {
        assert!(require(Operation::ListAdmins, Role::Superadmin).is_ok());
        assert!(require(Operation::ListAdmins, Role::Editor).is_err());
    }

    #[test]
    fn all_admin_roles_change_their_own_password() {
        for role in [Role::Superadmin, Role::Supereditor, Role::Editor] {
            assert!(require(Operation::ChangePassword, role).is_ok());
        }
        assert!(require(Operation::ChangePassword, Role::Member).is_err());
    }

    #[test]
    fn denial_is_forbidden() {
        let err = require(Operation::ListAdmins, Role::Member).unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));
        assert_eq!(err.status_code(), 403);
    }
}
