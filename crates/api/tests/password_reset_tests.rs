#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Integration tests for the member password-reset flow.

use axum::http::StatusCode;
use parish_test_fixtures::{
    body_json, create_test_app, create_test_state, create_test_state_with_failing_email,
    login_verified_member, post_json, register_member, reset_code_for,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn full_reset_flow_replaces_the_password() {
    let state = create_test_state();
    let app = create_test_app(state.clone());
    login_verified_member(&app, &state, "jane@example.com", "Secret1!").await;

    let response = app
        .clone()
        .oneshot(post_json("/members/send-reset-code", &json!({ "email": "jane@example.com" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Reset code sent to your email.");

    let code = reset_code_for(&state, "jane@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/members/verify-reset-code",
            &json!({ "email": "jane@example.com", "code": code }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Code verified.");

    let response = app
        .clone()
        .oneshot(post_json(
            "/members/reset-password",
            &json!({ "email": "jane@example.com", "code": code, "newPassword": "Fresh1!!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Password reset successful.");

    // Old password no longer works; the new one does
    let old = app
        .clone()
        .oneshot(post_json(
            "/members/login",
            &json!({ "email": "jane@example.com", "password": "Secret1!" }),
        ))
        .await
        .unwrap();
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);

    let new = app
        .oneshot(post_json(
            "/members/login",
            &json!({ "email": "jane@example.com", "password": "Fresh1!!" }),
        ))
        .await
        .unwrap();
    assert_eq!(new.status(), StatusCode::OK);
}

#[tokio::test]
async fn reset_code_is_single_use() {
    let state = create_test_state();
    let app = create_test_app(state.clone());
    login_verified_member(&app, &state, "jane@example.com", "Secret1!").await;

    app.clone()
        .oneshot(post_json("/members/send-reset-code", &json!({ "email": "jane@example.com" })))
        .await
        .unwrap();
    let code = reset_code_for(&state, "jane@example.com").await;

    let body =
        json!({ "email": "jane@example.com", "code": code, "newPassword": "Fresh1!!" });
    let first = app.clone().oneshot(post_json("/members/reset-password", &body)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(post_json("/members/reset-password", &body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(second).await["message"], "No reset code found.");
}

#[tokio::test]
async fn reset_endpoints_reject_bad_input() {
    let state = create_test_state();
    let app = create_test_app(state.clone());
    register_member(&app, "Jane", "jane@example.com", "Secret1!").await;

    // No reset has been requested yet
    let response = app
        .clone()
        .oneshot(post_json(
            "/members/verify-reset-code",
            &json!({ "email": "jane@example.com", "code": "123456" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No reset code found.");

    // Unknown member
    let response = app
        .clone()
        .oneshot(post_json("/members/send-reset-code", &json!({ "email": "nobody@example.com" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Wrong code once a reset is active
    app.clone()
        .oneshot(post_json("/members/send-reset-code", &json!({ "email": "jane@example.com" })))
        .await
        .unwrap();
    let code = reset_code_for(&state, "jane@example.com").await;
    let wrong = if code == "000000" { "000001" } else { "000000" };
    let response = app
        .clone()
        .oneshot(post_json(
            "/members/verify-reset-code",
            &json!({ "email": "jane@example.com", "code": wrong }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid code.");

    // New password too short
    let response = app
        .oneshot(post_json(
            "/members/reset-password",
            &json!({ "email": "jane@example.com", "code": code, "newPassword": "short" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn send_reset_code_surfaces_email_outage() {
    let state = create_test_state_with_failing_email();
    let app = create_test_app(state);
    register_member(&app, "Jane", "jane@example.com", "Secret1!").await;

    let response = app
        .oneshot(post_json("/members/send-reset-code", &json!({ "email": "jane@example.com" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
