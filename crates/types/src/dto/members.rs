use serde::{Deserialize, Serialize};

use crate::entities::{MemberAccount, Role};

/// Body for `POST /members/register`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body for `POST /members/verify`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}

/// Body for `POST /members/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberLoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for the single-field email endpoints (resend-code, send-reset-code).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub email: String,
}

/// Body for `POST /members/verify-reset-code`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResetCodeRequest {
    pub email: String,
    pub code: String,
}

/// Body for `POST /members/reset-password`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// Public view of a member account. Never carries secret material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&MemberAccount> for MemberProfile {
    fn from(member: &MemberAccount) -> Self {
        Self { name: member.name.clone(), email: member.email.clone(), role: Role::Member }
    }
}

/// Response for a successful member login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberLoginResponse {
    pub success: bool,
    pub token: String,
    pub member: MemberProfile,
}

/// Generic `{success, message}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }
}
