//! Handwriting transcription provider
//!
//! [`TranscriptionProvider`] abstracts the vision model that turns an image
//! into text. [`GeminiClient`] talks to the Google Generative Language
//! `generateContent` endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::OcrConfig;

/// Instruction sent alongside every image
pub const TRANSCRIPTION_PROMPT: &str = "Extract all text from this handwritten image. \
Return only the extracted text, nothing else. If no text is found, return 'No text detected'.";

/// Sentinel the model returns for blank images
pub const NO_TEXT_SENTINEL: &str = "No text detected";

/// Errors raised while transcribing an image
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    /// Non-success response; carries the API's own message when it sent one
    #[error("{0}")]
    Api(String),

    #[error("Failed to reach transcription service: {0}")]
    Http(String),

    #[error("No text could be extracted from the image")]
    NoContent,

    #[error("No readable text found in the image")]
    NoReadableText,
}

/// Image payload handed to a provider
#[derive(Debug, Clone)]
pub struct ImageData {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Vision model that transcribes handwriting
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe one image using the given service credential.
    ///
    /// Returns the raw model text; callers decide whether it is readable.
    async fn transcribe(
        &self,
        api_key: &str,
        image: &ImageData,
    ) -> std::result::Result<String, TranscriptionError>;
}

/// Trimmed transcript, or `NoReadableText` for blank output and the sentinel
pub fn readable_text(raw: &str) -> std::result::Result<String, TranscriptionError> {
    let text = raw.trim();
    if text.is_empty() || text.eq_ignore_ascii_case(NO_TEXT_SENTINEL) {
        return Err(TranscriptionError::NoReadableText);
    }
    Ok(text.to_string())
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_k: 32,
            top_p: 1.0,
            max_output_tokens: 4096,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build transcription HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TranscriptionProvider for GeminiClient {
    async fn transcribe(
        &self,
        api_key: &str,
        image: &ImageData,
    ) -> std::result::Result<String, TranscriptionError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: TRANSCRIPTION_PROMPT,
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: &image.mime_type,
                            data: STANDARD.encode(&image.bytes),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig::default(),
        };

        debug!(
            endpoint = %self.endpoint,
            mime_type = %image.mime_type,
            size = image.bytes.len(),
            "Submitting image for transcription"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, timeout = e.is_timeout(), "Transcription request failed");
                TranscriptionError::Http(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("API request failed: {}", status.as_u16()));
            warn!(status = status.as_u16(), %message, "Transcription API returned an error");
            return Err(TranscriptionError::Api(message));
        }

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|_| TranscriptionError::NoContent)?;

        parsed.first_text().ok_or(TranscriptionError::NoContent)
    }
}
