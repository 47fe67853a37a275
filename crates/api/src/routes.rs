use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    handlers::{health, members, users},
    middleware::logging_middleware,
    state::AppState,
};

/// Create the router with state and middleware applied.
///
/// Authentication is handled per-route by the [`Auth`](crate::extract::Auth)
/// extractor; everything not taking it is public by construction.
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Member self-service
        .route("/members/register", post(members::register))
        .route("/members/verify", post(members::verify))
        .route("/members/login", post(members::login))
        .route("/members/resend-code", post(members::resend_code))
        .route("/members/send-reset-code", post(members::send_reset_code))
        .route("/members/verify-reset-code", post(members::verify_reset_code))
        .route("/members/reset-password", post(members::reset_password))
        // Admin account management
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/users/admin/login", post(users::onboarding_login))
        .route("/users/change-password", post(users::change_password))
        .route("/auth/login", post(users::admin_login))
        .route("/auth/me", get(users::me))
        // Probes
        .route("/healthz", get(health::healthz))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
