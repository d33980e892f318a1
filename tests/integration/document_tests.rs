//! Document store endpoint tests

use axum::http::{header, StatusCode};

use crate::common::*;

async fn scanned(app: &TestApp, session: &Session, name: &str) -> serde_json::Value {
    let response = app
        .upload_scan(&session.token, name, "image/jpeg", &png_bytes())
        .await;
    response.assert_created();
    let body: serde_json::Value = response.json();
    body["document"].clone()
}

async fn premium_session(app: &TestApp, email: &str) -> Session {
    let admin = app.register_admin().await;
    let session = app.register(email).await;
    app.send_json_auth(
        "PATCH",
        &format!("/api/v1/admin/profiles/{}", session.profile.id),
        serde_json::json!({"subscription_type": "premium"}),
        &admin.token,
    )
    .await
    .assert_ok();
    session
}

#[tokio::test]
async fn test_list_search_and_export() {
    let app = TestApp::new().await;
    app.seed_api_key(TEST_API_KEY).await;
    mock_transcription(&app.ocr, "Buy milk and eggs").await;
    let session = premium_session(&app, "writer@example.com").await;

    let first = scanned(&app, &session, "shopping list.jpg").await;
    scanned(&app, &session, "second.jpg").await;

    let all: serde_json::Value = app.get_auth("/api/v1/documents", &session.token).await.json();
    assert_eq!(all.as_array().unwrap().len(), 2);
    // Newest first
    assert_eq!(all[0]["title"], "second.jpg");

    let hits: serde_json::Value = app
        .get_auth("/api/v1/documents?search=SHOPPING", &session.token)
        .await
        .json();
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let by_text: serde_json::Value = app
        .get_auth("/api/v1/documents?search=eggs", &session.token)
        .await
        .json();
    assert_eq!(by_text.as_array().unwrap().len(), 2);

    let export = app
        .get_auth(
            &format!("/api/v1/documents/{}/export", first["id"].as_str().unwrap()),
            &session.token,
        )
        .await;
    export.assert_ok();
    assert_eq!(export.text(), "Buy milk and eggs");
    assert!(export.headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(
        export.headers[header::CONTENT_DISPOSITION].to_str().unwrap(),
        "attachment; filename=\"shopping_list.txt\""
    );
}

#[tokio::test]
async fn test_delete_document() {
    let app = TestApp::new().await;
    app.seed_api_key(TEST_API_KEY).await;
    mock_transcription(&app.ocr, "temporary").await;
    let session = app.register("writer@example.com").await;

    let document = scanned(&app, &session, "temp.png").await;
    let uri = format!("/api/v1/documents/{}", document["id"].as_str().unwrap());

    app.delete_auth(&uri, &session.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.get_auth(&uri, &session.token).await.assert_not_found();
    app.delete_auth(&uri, &session.token).await.assert_not_found();

    let all: serde_json::Value = app.get_auth("/api/v1/documents", &session.token).await.json();
    assert!(all.as_array().unwrap().is_empty());

    // Deleting does not give the scan back
    let profile: serde_json::Value = app.get_auth("/api/v1/profile", &session.token).await.json();
    assert_eq!(profile["scans_used"], 1);
}

#[tokio::test]
async fn test_documents_are_private() {
    let app = TestApp::new().await;
    app.seed_api_key(TEST_API_KEY).await;
    mock_transcription(&app.ocr, "private thoughts").await;
    let owner = app.register("owner@example.com").await;
    let other = app.register("other@example.com").await;

    let document = scanned(&app, &owner, "secret.png").await;
    let uri = format!("/api/v1/documents/{}", document["id"].as_str().unwrap());

    app.get_auth(&uri, &other.token).await.assert_not_found();
    app.delete_auth(&uri, &other.token).await.assert_not_found();

    let others: serde_json::Value = app.get_auth("/api/v1/documents", &other.token).await.json();
    assert!(others.as_array().unwrap().is_empty());

    app.get_auth(&uri, &owner.token).await.assert_ok();
}
