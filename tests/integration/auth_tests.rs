//! Account and session endpoint tests

use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_register_creates_free_profile() {
    let app = TestApp::new().await;
    let session = app.register("Writer@Example.com").await;

    assert_eq!(session.profile.email, "writer@example.com");
    assert_eq!(session.profile.scans_used, 0);
    assert_eq!(session.profile.max_scans, 1);
    assert!(!session.profile.is_admin);
}

#[tokio::test]
async fn test_register_configured_admin() {
    let app = TestApp::new().await;
    let session = app.register_admin().await;
    assert!(session.profile.is_admin);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new().await;
    app.register("writer@example.com").await;

    let response = app
        .post_json(
            "/api/v1/auth/register",
            json!({"email": "WRITER@example.com", "password": TEST_PASSWORD, "full_name": "Again"}),
        )
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let app = TestApp::new().await;

    let bad_email = app
        .post_json(
            "/api/v1/auth/register",
            json!({"email": "not-an-email", "password": TEST_PASSWORD, "full_name": "X"}),
        )
        .await;
    bad_email.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);

    let short_password = app
        .post_json(
            "/api/v1/auth/register",
            json!({"email": "a@example.com", "password": "short", "full_name": "X"}),
        )
        .await;
    short_password.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_and_me() {
    let app = TestApp::new().await;
    app.register("writer@example.com").await;

    let response = app
        .post_json(
            "/api/v1/auth/login",
            json!({"email": "writer@example.com", "password": TEST_PASSWORD}),
        )
        .await;
    response.assert_ok();
    let body: serde_json::Value = response.json();
    let token = body["access_token"].as_str().unwrap().to_string();
    assert_eq!(body["token_type"], "Bearer");

    let me = app.get_auth("/api/v1/auth/me", &token).await;
    me.assert_ok();
    let profile: serde_json::Value = me.json();
    assert_eq!(profile["email"], "writer@example.com");
    assert_eq!(profile["subscription_type"], "free");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new().await;
    app.register("writer@example.com").await;

    let response = app
        .post_json(
            "/api/v1/auth/login",
            json!({"email": "writer@example.com", "password": "not the password"}),
        )
        .await;
    response.assert_unauthorized();
    assert_eq!(response.error_message(), "Invalid email or password");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    app.get("/api/v1/profile").await.assert_unauthorized();
    app.get("/api/v1/documents").await.assert_unauthorized();
    app.get_auth("/api/v1/profile", "garbage").await.assert_unauthorized();
}

#[tokio::test]
async fn test_refresh_token() {
    let app = TestApp::new().await;
    let session = app.register("writer@example.com").await;

    let response = app
        .post_json(
            "/api/v1/auth/refresh",
            json!({"refresh_token": session.refresh_token}),
        )
        .await;
    response.assert_ok();
    let body: serde_json::Value = response.json();
    let token = body["access_token"].as_str().unwrap();
    app.get_auth("/api/v1/profile", token).await.assert_ok();

    // An access token is not a refresh token
    app.post_json(
        "/api/v1/auth/refresh",
        json!({"refresh_token": session.token}),
    )
    .await
    .assert_unauthorized();
}

#[tokio::test]
async fn test_logout_is_public() {
    let app = TestApp::new().await;
    let session = app.register("writer@example.com").await;

    let response = app
        .request_with_auth(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/v1/auth/logout")
                .body(axum::body::Body::empty())
                .unwrap(),
            &session.token,
        )
        .await;
    response.assert_ok();

    app.post_json("/api/v1/auth/logout", json!({})).await.assert_ok();
}

#[tokio::test]
async fn test_update_own_profile_name() {
    let app = TestApp::new().await;
    let session = app.register("writer@example.com").await;

    let response = app
        .send_json_auth(
            "PATCH",
            "/api/v1/profile",
            json!({"full_name": "  Grace Hopper "}),
            &session.token,
        )
        .await;
    response.assert_ok();
    let profile: serde_json::Value = response.json();
    assert_eq!(profile["full_name"], "Grace Hopper");
    assert_eq!(profile["scans_used"], 0);
}

#[tokio::test]
async fn test_navigation_and_plans() {
    let app = TestApp::new().await;
    let session = app.register("writer@example.com").await;

    let response = app
        .get_auth("/api/v1/navigation?view=settings", &session.token)
        .await;
    response.assert_ok();
    let nav: serde_json::Value = response.json();
    assert_eq!(nav["view"], "scanner");
    assert_eq!(nav["usage"], "0/1");
    assert_eq!(nav["can_scan"], true);
    assert_eq!(nav["remaining_scans"], 1);

    let plans: serde_json::Value = app.get("/api/v1/plans").await.json();
    assert_eq!(plans.as_array().unwrap().len(), 2);
    assert_eq!(plans[0]["max_scans"], 1);
    assert!(plans[1]["max_scans"].is_null());
}
