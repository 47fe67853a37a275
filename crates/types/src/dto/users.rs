use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{AccountStatus, AdminAccount, Role};

/// Body for `POST /users` (superadmin only).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    /// Default password the invited admin logs in with once.
    pub pass: String,
    pub role: Role,
    #[serde(default)]
    pub status: AccountStatus,
    pub name: String,
}

/// Public view of an admin account. Never carries secret material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub status: AccountStatus,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&AdminAccount> for AdminProfile {
    fn from(admin: &AdminAccount) -> Self {
        Self {
            email: admin.email.clone(),
            name: admin.name.clone(),
            role: admin.role,
            status: admin.status,
            must_change_password: admin.must_change_password,
            created_at: admin.created_at,
        }
    }
}

/// Response for `POST /users`.
///
/// `default_password` is always returned so the superadmin can relay it out
/// of band. `one_time_link` is populated only when the invitation email could
/// not be delivered, as a manual fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub success: bool,
    pub user: AdminProfile,
    pub default_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_time_link: Option<String>,
    pub message: String,
}

/// Body for `POST /users/admin/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingLoginRequest {
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Body for `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful admin authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSessionResponse {
    pub success: bool,
    pub token: String,
    pub user: AdminProfile,
}

/// Body for `POST /users/change-password`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Response for `GET /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersListResponse {
    pub success: bool,
    pub users: Vec<AdminProfile>,
}

/// Response for `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub success: bool,
    pub user: AdminProfile,
}
