//! Scanner endpoint tests

use axum::http::StatusCode;

use scriptscan::db::{ProfileRepository, ScanLogRepository};

use crate::common::*;

#[tokio::test]
async fn test_successful_scan_stores_document_and_counts() {
    let app = TestApp::new().await;
    app.seed_api_key(TEST_API_KEY).await;
    mock_transcription(&app.ocr, "  Dear diary,\ntoday I learned Rust.\n").await;
    let session = app.register("writer@example.com").await;

    let response = app
        .upload_scan(&session.token, "diary.png", "image/png", &png_bytes())
        .await;
    response.assert_created();

    let body: serde_json::Value = response.json();
    assert_eq!(body["text"], "Dear diary,\ntoday I learned Rust.");
    assert_eq!(body["document"]["title"], "diary.png");
    assert!(body["document"]["image_url"].is_null());
    assert_eq!(body["scans_used"], 1);
    assert_eq!(body["usage"], "1/1");

    let documents: serde_json::Value = app.get_auth("/api/v1/documents", &session.token).await.json();
    assert_eq!(documents.as_array().unwrap().len(), 1);

    let logs = ScanLogRepository::new(&app.state.db)
        .list_for_user(session.profile.id)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].success);
    assert!(logs[0].document_id.is_some());
}

#[tokio::test]
async fn test_free_user_at_limit_is_rejected_before_transcription() {
    let app = TestApp::new().await;
    app.seed_api_key(TEST_API_KEY).await;
    let session = app.register("writer@example.com").await;
    ProfileRepository::new(&app.state.db)
        .increment_scan_count(session.profile.id)
        .await
        .unwrap();
    expect_no_transcription(&app.ocr).await;

    let response = app
        .upload_scan(&session.token, "page.png", "image/png", &png_bytes())
        .await;
    response.assert_forbidden();
    assert_eq!(
        response.error_message(),
        "Scan limit reached. Upgrade to Premium for unlimited scans."
    );

    let nav: serde_json::Value = app.get_auth("/api/v1/navigation", &session.token).await.json();
    assert_eq!(nav["view"], "limit_reached");
}

#[tokio::test]
async fn test_second_free_scan_hits_limit() {
    let app = TestApp::new().await;
    app.seed_api_key(TEST_API_KEY).await;
    mock_transcription(&app.ocr, "first page").await;
    let session = app.register("writer@example.com").await;

    app.upload_scan(&session.token, "one.png", "image/png", &png_bytes())
        .await
        .assert_created();
    app.upload_scan(&session.token, "two.png", "image/png", &png_bytes())
        .await
        .assert_forbidden();

    assert_eq!(transcription_calls(&app.ocr).await, 1);
}

#[tokio::test]
async fn test_admin_scans_past_limit() {
    let app = TestApp::new().await;
    app.seed_api_key(TEST_API_KEY).await;
    mock_transcription(&app.ocr, "admin notes").await;
    let session = app.register_admin().await;

    for _ in 0..3 {
        app.upload_scan(&session.token, "n.png", "image/png", &png_bytes())
            .await
            .assert_created();
    }

    let profile: serde_json::Value = app.get_auth("/api/v1/profile", &session.token).await.json();
    assert_eq!(profile["scans_used"], 3);
}

#[tokio::test]
async fn test_non_image_upload_is_rejected() {
    let app = TestApp::new().await;
    app.seed_api_key(TEST_API_KEY).await;
    expect_no_transcription(&app.ocr).await;
    let session = app.register("writer@example.com").await;

    let response = app
        .upload_scan(&session.token, "notes.txt", "text/plain", b"plain text")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.error_message(), "Please select a valid image file");

    let empty = app
        .upload_scan(&session.token, "blank.png", "image/png", &[])
        .await;
    empty.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_scan_without_active_key_is_unavailable() {
    let app = TestApp::new().await;
    expect_no_transcription(&app.ocr).await;
    let session = app.register("writer@example.com").await;

    let response = app
        .upload_scan(&session.token, "page.png", "image/png", &png_bytes())
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.error_message(),
        "Service temporarily unavailable. Please contact support."
    );

    let profile: serde_json::Value = app.get_auth("/api/v1/profile", &session.token).await.json();
    assert_eq!(profile["scans_used"], 0);
}

#[tokio::test]
async fn test_transcription_error_is_reported_and_logged() {
    let app = TestApp::new().await;
    app.seed_api_key(TEST_API_KEY).await;
    mock_transcription_error(&app.ocr, 400, "API key not valid. Please pass a valid API key.").await;
    let session = app.register("writer@example.com").await;

    let response = app
        .upload_scan(&session.token, "page.png", "image/png", &png_bytes())
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.error_message(),
        "API key not valid. Please pass a valid API key."
    );

    let logs = ScanLogRepository::new(&app.state.db)
        .list_for_user(session.profile.id)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert!(!logs[0].success);
    assert!(logs[0].document_id.is_none());

    let documents: serde_json::Value = app.get_auth("/api/v1/documents", &session.token).await.json();
    assert!(documents.as_array().unwrap().is_empty());

    let profile: serde_json::Value = app.get_auth("/api/v1/profile", &session.token).await.json();
    assert_eq!(profile["scans_used"], 0);
}

#[tokio::test]
async fn test_blank_transcript_is_not_stored() {
    let app = TestApp::new().await;
    app.seed_api_key(TEST_API_KEY).await;
    mock_transcription(&app.ocr, "No text detected").await;
    let session = app.register("writer@example.com").await;

    let response = app
        .upload_scan(&session.token, "blank.png", "image/png", &png_bytes())
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let profile: serde_json::Value = app.get_auth("/api/v1/profile", &session.token).await.json();
    assert_eq!(profile["scans_used"], 0);
}
