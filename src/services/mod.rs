//! Business logic services

pub mod auth;
pub mod ocr;
pub mod scanner;
pub mod session;
pub mod stats;

pub use auth::AuthService;
pub use ocr::{GeminiClient, ImageData, TranscriptionError, TranscriptionProvider};
pub use scanner::{ImageUpload, ScanError, ScanOrchestrator, ScanOutcome};
pub use session::{SessionEvent, SessionManager};
