//! Member-facing endpoints: registration, verification, login and
//! password reset. All of these are public; members never hold a session
//! before they sign in.

use axum::{Json, extract::State, http::StatusCode};
use parish_types::dto::{
    EmailRequest, MemberLoginRequest, MemberLoginResponse, MemberProfile, MessageResponse,
    RegisterRequest, ResetPasswordRequest, VerifyRequest, VerifyResetCodeRequest,
};

use crate::{error::ApiResult, state::AppState};

/// `POST /members/register`
///
/// Always 201 when the account was created, even if the verification email
/// failed to go out; the message tells the member which case they hit.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let outcome = state.members().register(&body.name, &body.email, &body.password).await?;
    let message = if outcome.notified {
        "Registration successful. Please check your email for the verification code."
    } else {
        "Registration successful. However, there was an issue sending the verification email. \
         Please try to resend the code."
    };
    Ok((StatusCode::CREATED, Json(MessageResponse::ok(message))))
}

/// `POST /members/verify`
pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.members().verify(&body.email, &body.code).await?;
    Ok(Json(MessageResponse::ok("Email verified successfully.")))
}

/// `POST /members/login`
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<MemberLoginRequest>,
) -> ApiResult<Json<MemberLoginResponse>> {
    let session = state.members().login(&body.email, &body.password).await?;
    Ok(Json(MemberLoginResponse {
        success: true,
        token: session.token,
        member: MemberProfile::from(&session.member),
    }))
}

/// `POST /members/resend-code`
pub async fn resend_code(
    State(state): State<AppState>,
    Json(body): Json<EmailRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.members().resend_code(&body.email).await?;
    Ok(Json(MessageResponse::ok("Verification code resent.")))
}

/// `POST /members/send-reset-code`
pub async fn send_reset_code(
    State(state): State<AppState>,
    Json(body): Json<EmailRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.members().send_reset_code(&body.email).await?;
    Ok(Json(MessageResponse::ok("Reset code sent to your email.")))
}

/// `POST /members/verify-reset-code`
pub async fn verify_reset_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyResetCodeRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.members().verify_reset_code(&body.email, &body.code).await?;
    Ok(Json(MessageResponse::ok("Code verified.")))
}

/// `POST /members/reset-password`
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.members().reset_password(&body.email, &body.code, &body.new_password).await?;
    Ok(Json(MessageResponse::ok("Password reset successful.")))
}
