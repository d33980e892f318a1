//! Transcribed document model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored transcription result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub original_text: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a document
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: Uuid,
    pub title: String,
    pub original_text: String,
    pub image_url: Option<String>,
}

/// Query string for the document list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentQuery {
    pub search: Option<String>,
}

impl Document {
    /// Case-insensitive substring match on title or extracted text
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self.original_text.to_lowercase().contains(&term)
    }

    /// File name offered when exporting the document as plain text
    pub fn export_file_name(&self) -> String {
        let stem = self
            .title
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.title);
        let safe: String = stem
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        if safe.is_empty() {
            format!("{}.txt", self.id)
        } else {
            format!("{}.txt", safe)
        }
    }
}

/// Apply the dashboard search box to a document list.
///
/// A blank term keeps every document.
pub fn filter_documents(documents: Vec<Document>, term: Option<&str>) -> Vec<Document> {
    match term.map(str::trim) {
        Some(term) if !term.is_empty() => {
            documents.into_iter().filter(|d| d.matches(term)).collect()
        }
        _ => documents,
    }
}
