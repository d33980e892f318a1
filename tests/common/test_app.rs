//! Test application setup utilities
//!
//! Builds the real router over a temporary SQLite database, with the
//! transcription client pointed at a local mock server.

use std::sync::Arc;

use axum::{body::Body, http::Request, Router};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::MockServer;

use scriptscan::{
    api_router,
    config::{AppConfig, DatabaseConfig, OcrConfig},
    db,
    models::{AuthResponse, Profile},
    services::GeminiClient,
    AppState,
};

use super::fixtures::{ADMIN_EMAIL, TEST_PASSWORD};

/// Test application wrapper for integration testing
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    /// Stand-in for the transcription API
    pub ocr: MockServer,
}

/// Signed-in account: tokens plus the profile returned at sign-in
pub struct Session {
    pub token: String,
    pub refresh_token: String,
    pub profile: Profile,
}

impl TestApp {
    /// Create a new test application with a fresh temporary database
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a new test application with custom configuration
    pub async fn with_config(mut config: AppConfig) -> Self {
        let ocr = MockServer::start().await;
        config.ocr = OcrConfig {
            base_url: format!("{}/v1beta", ocr.uri()),
            timeout_secs: 5,
            ..OcrConfig::default()
        };

        let db = db::init_pool(&config.database)
            .await
            .expect("Failed to initialize test database");
        let transcriber =
            GeminiClient::new(&config.ocr).expect("Failed to build transcription client");

        let state = AppState::new(config, db, Arc::new(transcriber));
        let router = api_router(state.clone());

        Self { router, state, ocr }
    }

    /// Register an account and return its session
    pub async fn register(&self, email: &str) -> Session {
        let response = self
            .post_json(
                "/api/v1/auth/register",
                json!({
                    "email": email,
                    "password": TEST_PASSWORD,
                    "full_name": "Test User",
                }),
            )
            .await;
        response.assert_created();

        let auth: AuthResponse = response.json();
        Session {
            token: auth.access_token,
            refresh_token: auth.refresh_token,
            profile: auth.profile,
        }
    }

    /// Register the configured admin account
    pub async fn register_admin(&self) -> Session {
        self.register(ADMIN_EMAIL).await
    }

    /// Store an active transcription key directly
    pub async fn seed_api_key(&self, secret: &str) -> Uuid {
        db::ApiKeyRepository::new(&self.state.db)
            .create(&self.state.config.ocr.service_name, secret, true, None)
            .await
            .expect("Failed to seed api key")
            .id
    }

    /// Make a GET request to the test application
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.request(json_request("POST", uri, body)).await
    }

    /// Authenticated GET
    pub async fn get_auth(&self, uri: &str, token: &str) -> TestResponse {
        self.request_with_auth(
            Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap(),
            token,
        )
        .await
    }

    /// Authenticated request with JSON body
    pub async fn send_json_auth(
        &self,
        method: &str,
        uri: &str,
        body: serde_json::Value,
        token: &str,
    ) -> TestResponse {
        self.request_with_auth(json_request(method, uri, body), token)
            .await
    }

    /// Authenticated DELETE
    pub async fn delete_auth(&self, uri: &str, token: &str) -> TestResponse {
        self.request_with_auth(
            Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap(),
            token,
        )
        .await
    }

    /// Upload a file to the scanner as multipart `file`
    pub async fn upload_scan(
        &self,
        token: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> TestResponse {
        let boundary = "scriptscan-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/scans")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        self.request_with_auth(request, token).await
    }

    /// Make a request with authentication
    pub async fn request_with_auth(&self, request: Request<Body>, token: &str) -> TestResponse {
        let (mut parts, body) = request.into_parts();
        parts.headers.insert(
            "Authorization",
            format!("Bearer {}", token).parse().unwrap(),
        );
        self.request(Request::from_parts(parts, body)).await
    }

    /// Make an arbitrary request
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: axum::http::StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: bytes::Bytes,
}

impl TestResponse {
    /// Get the response body as a string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Parse the response body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse response as JSON")
    }

    /// The `message` field of an error body
    pub fn error_message(&self) -> String {
        let body: serde_json::Value = self.json();
        body["message"].as_str().unwrap_or_default().to_string()
    }

    /// Assert the response status
    pub fn assert_status(&self, expected: axum::http::StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    /// Assert the response status is OK (200)
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::OK)
    }

    /// Assert the response status is Created (201)
    pub fn assert_created(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::CREATED)
    }

    /// Assert the response status is Unauthorized (401)
    pub fn assert_unauthorized(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::UNAUTHORIZED)
    }

    /// Assert the response status is Forbidden (403)
    pub fn assert_forbidden(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::FORBIDDEN)
    }

    /// Assert the response status is Not Found (404)
    pub fn assert_not_found(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::NOT_FOUND)
    }
}

/// Create a test configuration with a temporary SQLite database
pub fn test_config() -> AppConfig {
    let db_path = std::env::temp_dir().join(format!(
        "scriptscan_test_{}.db",
        Uuid::new_v4().simple()
    ));

    let mut config = AppConfig::default();
    config.database = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", db_path.display()),
        max_connections: 1,
        connect_timeout_secs: 30,
    };
    config.auth.jwt_secret = "test_secret_key_that_is_at_least_32_bytes_long".to_string();
    config.auth.admin_emails = vec![ADMIN_EMAIL.to_string()];
    config.server.max_upload_bytes = 1024 * 1024;
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = TestApp::new().await;
        let response = app.get("/api/v1/health").await;
        response.assert_ok();
        let json: serde_json::Value = response.json();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_endpoint() {
        let app = TestApp::new().await;
        app.get("/api/v1/health/ready").await.assert_ok();
    }
}
