// Test fixtures are allowed to use unwrap/expect for clear failure messages
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![deny(unsafe_code)]

//! Test fixtures and utilities for Parish API integration tests.
//!
//! Shared helpers so integration tests don't each rebuild the app, seed
//! accounts, or dig secrets out of storage by hand. Everything works
//! against the in-memory backend.
//!
//! ```rust,no_run
//! use parish_test_fixtures::{create_test_app, create_test_state, register_member};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let state = create_test_state();
//!     let app = create_test_app(state.clone());
//!
//!     register_member(&app, "Jane", "jane@example.com", "Secret1!").await;
//! }
//! ```

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use parish_api::{AppState, create_router_with_state};
use parish_core::{
    AdminRepository, EmailService, MemberRepository, MockEmailSender, PasswordHasher,
};
use parish_storage::Backend;
use parish_types::{AccountStatus, AdminAccount, Role, entities::secret};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Creates a test AppState with in-memory storage and a mock email sender.
pub fn create_test_state() -> AppState {
    AppState::new_test(Backend::memory(), EmailService::new(Box::new(MockEmailSender::new())))
}

/// Same as [`create_test_state`], but every email send fails.
///
/// Used to exercise the degraded paths: registration without a
/// verification email and invitation links returned in the response.
pub fn create_test_state_with_failing_email() -> AppState {
    AppState::new_test(
        Backend::memory(),
        EmailService::new(Box::new(MockEmailSender::new_failing())),
    )
}

/// Creates the full application router for the given state.
pub fn create_test_app(state: AppState) -> axum::Router {
    create_router_with_state(state)
}

/// Parses an HTTP response body as JSON.
///
/// # Panics
///
/// Panics if the body cannot be read or parsed as valid JSON.
pub async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Builds a JSON POST request.
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a JSON POST request with a bearer token.
pub fn post_json_auth(uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a GET request with a bearer token.
pub fn get_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Registers a member through the API.
///
/// # Panics
///
/// Panics if the registration does not return HTTP 201.
pub async fn register_member(app: &axum::Router, name: &str, email: &str, password: &str) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/members/register",
            &json!({ "name": name, "email": email, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED, "Registration should succeed");
}

/// Reads the pending verification code straight from storage.
///
/// # Panics
///
/// Panics if the member does not exist or has no pending code.
pub async fn verification_code_for(state: &AppState, email: &str) -> String {
    let repo = MemberRepository::new(state.storage().clone());
    repo.get(email)
        .await
        .unwrap()
        .expect("member should exist")
        .verification_code
        .expect("member should have a pending verification code")
}

/// Reads the active reset code straight from storage.
///
/// # Panics
///
/// Panics if the member does not exist or has no active reset code.
pub async fn reset_code_for(state: &AppState, email: &str) -> String {
    let repo = MemberRepository::new(state.storage().clone());
    repo.get(email)
        .await
        .unwrap()
        .expect("member should exist")
        .reset_code
        .expect("member should have an active reset code")
}

/// Reads the pending onboarding token straight from storage.
///
/// # Panics
///
/// Panics if the admin does not exist or the token was already consumed.
pub async fn onboarding_token_for(state: &AppState, email: &str) -> String {
    let repo = AdminRepository::new(state.storage().clone());
    repo.get(email)
        .await
        .unwrap()
        .expect("admin should exist")
        .one_time_token
        .expect("admin should have a pending onboarding token")
}

/// Seeds an already-onboarded admin directly in storage and returns a
/// session token for it.
///
/// # Panics
///
/// Panics if the account cannot be created.
pub async fn seed_admin(state: &AppState, email: &str, password: &str, role: Role) -> String {
    let hasher = PasswordHasher::with_cost(4);
    let mut admin = AdminAccount::builder()
        .email(email)
        .name("Seeded Admin")
        .password_hash(hasher.hash(password).unwrap())
        .role(role)
        .status(AccountStatus::Active)
        .one_time_token(secret::generate_one_time_token())
        .create()
        .unwrap();
    admin.consume_one_time_token();
    admin.set_password(hasher.hash(password).unwrap());

    let repo = AdminRepository::new(state.storage().clone());
    repo.create(&admin).await.unwrap();
    state.sessions().issue_admin(&admin).unwrap()
}

/// Seeds a superadmin and returns a session token for it.
pub async fn seed_superadmin(state: &AppState) -> String {
    seed_admin(state, "root@parish.test", "RootPass1!", Role::Superadmin).await
}

/// Registers and verifies a member, returning a login token.
///
/// # Panics
///
/// Panics if any step of the flow fails.
pub async fn login_verified_member(
    app: &axum::Router,
    state: &AppState,
    email: &str,
    password: &str,
) -> String {
    register_member(app, "Member", email, password).await;
    let code = verification_code_for(state, email).await;

    let response = app
        .clone()
        .oneshot(post_json("/members/verify", &json!({ "email": email, "code": code })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "Verification should succeed");

    let response = app
        .clone()
        .oneshot(post_json("/members/login", &json!({ "email": email, "password": password })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "Login should succeed");
    body_json(response).await["token"].as_str().expect("login should return a token").to_string()
}
