//! Admin account endpoints: invitation, onboarding, login and password
//! management. Role requirements are enforced in the lifecycle layer from
//! the verified session's role.

use axum::{Json, extract::State};
use parish_types::{
    Error,
    dto::{
        AdminLoginRequest, AdminProfile, AdminSessionResponse, ChangePasswordRequest,
        CreateUserRequest, CreateUserResponse, MeResponse, MessageResponse,
        OnboardingLoginRequest, UsersListResponse,
    },
};

use crate::{error::ApiResult, extract::Auth, state::AppState};

/// `POST /users` — invite a new admin. Superadmin only.
pub async fn create_user(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<Json<CreateUserResponse>> {
    let outcome = state
        .admins()
        .create_admin(ctx.role, &body.email, &body.name, body.role, body.status, &body.pass)
        .await?;
    let message = if outcome.notified {
        "Admin created successfully and invitation email sent."
    } else {
        "Admin created successfully but email sending failed. Use the provided link."
    };
    Ok(Json(CreateUserResponse {
        success: true,
        user: AdminProfile::from(&outcome.admin),
        default_password: body.pass,
        one_time_link: outcome.one_time_link,
        message: message.to_string(),
    }))
}

/// `GET /users` — list all admin accounts. Superadmin only.
pub async fn list_users(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<UsersListResponse>> {
    let admins = state.admins().list(ctx.role).await?;
    Ok(Json(UsersListResponse {
        success: true,
        users: admins.iter().map(AdminProfile::from).collect(),
    }))
}

/// `POST /users/admin/login` — first login via the invitation link.
pub async fn onboarding_login(
    State(state): State<AppState>,
    Json(body): Json<OnboardingLoginRequest>,
) -> ApiResult<Json<AdminSessionResponse>> {
    if body.email.is_empty() || body.password.is_empty() || body.token.is_empty() {
        return Err(Error::validation("Missing credentials").into());
    }
    let session = state.admins().onboarding_login(&body.email, &body.password, &body.token).await?;
    Ok(Json(AdminSessionResponse {
        success: true,
        token: session.token,
        user: AdminProfile::from(&session.admin),
    }))
}

/// `POST /auth/login` — regular admin login.
pub async fn admin_login(
    State(state): State<AppState>,
    Json(body): Json<AdminLoginRequest>,
) -> ApiResult<Json<AdminSessionResponse>> {
    let session = state.admins().login(&body.email, &body.password).await?;
    Ok(Json(AdminSessionResponse {
        success: true,
        token: session.token,
        user: AdminProfile::from(&session.admin),
    }))
}

/// `POST /users/change-password` — change one's own password.
pub async fn change_password(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Json(body): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .admins()
        .change_password(ctx.role, &ctx.email, &body.old_password, &body.new_password)
        .await?;
    Ok(Json(MessageResponse::ok("Password changed successfully.")))
}

/// `GET /auth/me` — the account behind the current session.
pub async fn me(State(state): State<AppState>, Auth(ctx): Auth) -> ApiResult<Json<MeResponse>> {
    let admin = state.admins().me(ctx.role, &ctx.email).await?;
    Ok(Json(MeResponse { success: true, user: AdminProfile::from(&admin) }))
}
