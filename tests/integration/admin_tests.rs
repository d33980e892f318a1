//! Admin tool endpoint tests

use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_usage_stats() {
    let app = TestApp::new().await;
    app.seed_api_key(TEST_API_KEY).await;
    mock_transcription(&app.ocr, "hello").await;
    let admin = app.register_admin().await;
    let user = app.register("writer@example.com").await;

    app.upload_scan(&user.token, "a.png", "image/png", &png_bytes())
        .await
        .assert_created();

    let response = app.get_auth("/api/v1/admin/stats", &admin.token).await;
    response.assert_ok();
    let stats: serde_json::Value = response.json();
    assert_eq!(stats["total_users"], 2);
    assert_eq!(stats["admin_users"], 1);
    assert_eq!(stats["premium_users"], 0);
    assert_eq!(stats["total_documents"], 1);
    assert_eq!(stats["scans_today"], 1);
    assert_eq!(stats["api_calls_today"], 1);
    assert_eq!(stats["success_rate"], 100.0);
}

#[tokio::test]
async fn test_upgrade_to_premium_lifts_limit() {
    let app = TestApp::new().await;
    app.seed_api_key(TEST_API_KEY).await;
    mock_transcription(&app.ocr, "page").await;
    let admin = app.register_admin().await;
    let user = app.register("writer@example.com").await;

    app.upload_scan(&user.token, "1.png", "image/png", &png_bytes())
        .await
        .assert_created();
    app.upload_scan(&user.token, "2.png", "image/png", &png_bytes())
        .await
        .assert_forbidden();

    let response = app
        .send_json_auth(
            "PATCH",
            &format!("/api/v1/admin/profiles/{}", user.profile.id),
            json!({"subscription_type": "premium"}),
            &admin.token,
        )
        .await;
    response.assert_ok();
    let profile: serde_json::Value = response.json();
    assert_eq!(profile["subscription_type"], "premium");
    assert_eq!(profile["max_scans"], 1000);

    app.upload_scan(&user.token, "2.png", "image/png", &png_bytes())
        .await
        .assert_created();

    let nav: serde_json::Value = app.get_auth("/api/v1/navigation", &user.token).await.json();
    assert_eq!(nav["usage"], "2/∞");
}

#[tokio::test]
async fn test_reset_and_custom_limit() {
    let app = TestApp::new().await;
    let admin = app.register_admin().await;
    let user = app.register("writer@example.com").await;
    let uri = format!("/api/v1/admin/profiles/{}", user.profile.id);

    let profile: serde_json::Value = app
        .send_json_auth("PATCH", &uri, json!({"max_scans": 5, "reset_scans": true}), &admin.token)
        .await
        .json();
    assert_eq!(profile["max_scans"], 5);
    assert_eq!(profile["scans_used"], 0);
    assert_eq!(profile["subscription_type"], "free");

    app.send_json_auth("PATCH", &uri, json!({"max_scans": -1}), &admin.token)
        .await
        .assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_promote_to_admin_opens_settings() {
    let app = TestApp::new().await;
    let admin = app.register_admin().await;
    let user = app.register("writer@example.com").await;

    app.get_auth("/api/v1/admin/profiles", &user.token)
        .await
        .assert_forbidden();

    app.send_json_auth(
        "PATCH",
        &format!("/api/v1/admin/profiles/{}", user.profile.id),
        json!({"is_admin": true}),
        &admin.token,
    )
    .await
    .assert_ok();

    // Admin status is re-read on each request, the old token now works
    let profiles: serde_json::Value = app
        .get_auth("/api/v1/admin/profiles", &user.token)
        .await
        .json();
    assert_eq!(profiles.as_array().unwrap().len(), 2);

    let nav: serde_json::Value = app
        .get_auth("/api/v1/navigation?view=settings", &user.token)
        .await
        .json();
    assert_eq!(nav["view"], "settings");
}

#[tokio::test]
async fn test_admin_endpoints_reject_regular_users() {
    let app = TestApp::new().await;
    let user = app.register("writer@example.com").await;

    app.get_auth("/api/v1/admin/stats", &user.token)
        .await
        .assert_forbidden();
    app.send_json_auth(
        "PATCH",
        &format!("/api/v1/admin/profiles/{}", user.profile.id),
        json!({"subscription_type": "premium"}),
        &user.token,
    )
    .await
    .assert_forbidden();
}

#[tokio::test]
async fn test_update_unknown_profile() {
    let app = TestApp::new().await;
    let admin = app.register_admin().await;

    app.send_json_auth(
        "PATCH",
        &format!("/api/v1/admin/profiles/{}", uuid::Uuid::new_v4()),
        json!({"is_admin": true}),
        &admin.token,
    )
    .await
    .assert_not_found();
}
