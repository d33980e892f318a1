//! Configuration management
//!
//! This module provides YAML-based configuration management with support for:
//! - Environment variable overrides
//! - Multiple configuration file locations
//! - Default values for all settings

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::{DEFAULT_FREE_MAX_SCANS, UNLIMITED_MAX_SCANS};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// TLS/HTTPS configuration (if not set, server runs HTTP)
    #[serde(default)]
    pub tls: Option<TlsConfig>,
    /// Largest accepted upload, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Path to the client build output; served with SPA fallback when present
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

/// TLS/HTTPS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to TLS certificate file (PEM format)
    pub cert_file: PathBuf,
    /// Path to TLS private key file (PEM format)
    pub key_file: PathBuf,
    /// Minimum TLS version (1.2 or 1.3)
    #[serde(default = "default_min_tls_version")]
    pub min_version: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5080
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_min_tls_version() -> String {
    "1.3".to_string()
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_token_expiry")]
    pub token_expiry_hours: u64,
    #[serde(default = "default_refresh_expiry")]
    pub refresh_token_expiry_days: u64,
    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,
    /// Accounts registered with these emails get the admin flag
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

impl AuthConfig {
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|e| e.trim().eq_ignore_ascii_case(email.trim()))
    }
}

fn default_token_expiry() -> u64 {
    24
}

fn default_refresh_expiry() -> u64 {
    7
}

fn default_password_min_length() -> usize {
    8
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Log output target (console or file)
    #[serde(default)]
    pub target: LogTarget,
    /// Directory for log files (used when target is "file" or "both")
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,
    #[serde(default = "default_log_rotation")]
    pub daily_rotation: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

/// Log output target
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    #[default]
    Console,
    File,
    Both,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("/var/log/scriptscan")
}

fn default_log_prefix() -> String {
    "scriptscan".to_string()
}

fn default_log_rotation() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            target: LogTarget::default(),
            log_dir: default_log_dir(),
            log_prefix: default_log_prefix(),
            daily_rotation: default_log_rotation(),
        }
    }
}

/// Transcription (vision model) endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_base_url")]
    pub base_url: String,
    #[serde(default = "default_ocr_model")]
    pub model: String,
    /// API key service name the scanner looks up
    #[serde(default = "default_ocr_service_name")]
    pub service_name: String,
    #[serde(default = "default_ocr_timeout", alias = "timeout")]
    pub timeout_secs: u64,
}

fn default_ocr_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_ocr_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_ocr_service_name() -> String {
    "gemini".to_string()
}

fn default_ocr_timeout() -> u64 {
    60
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            base_url: default_ocr_base_url(),
            model: default_ocr_model(),
            service_name: default_ocr_service_name(),
            timeout_secs: default_ocr_timeout(),
        }
    }
}

/// Scan allowances per subscription tier
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuotaConfig {
    #[serde(default = "default_free_max_scans")]
    pub free_max_scans: i64,
    #[serde(default = "default_premium_max_scans")]
    pub premium_max_scans: i64,
}

fn default_free_max_scans() -> i64 {
    DEFAULT_FREE_MAX_SCANS
}

fn default_premium_max_scans() -> i64 {
    UNLIMITED_MAX_SCANS
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_max_scans: default_free_max_scans(),
            premium_max_scans: default_premium_max_scans(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                tls: None,
                max_upload_bytes: default_max_upload_bytes(),
                static_dir: None,
            },
            auth: AuthConfig {
                jwt_secret: "change-me-in-production-minimum-32-characters-long".to_string(),
                token_expiry_hours: default_token_expiry(),
                refresh_token_expiry_days: default_refresh_expiry(),
                password_min_length: default_password_min_length(),
                admin_emails: Vec::new(),
            },
            database: DatabaseConfig {
                url: "sqlite://./data/scriptscan.db".to_string(),
                max_connections: default_max_connections(),
                connect_timeout_secs: default_connect_timeout(),
            },
            logging: LoggingConfig::default(),
            ocr: OcrConfig::default(),
            quota: QuotaConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file (YAML)
    /// 3. Environment variables
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let config_path = std::env::var("SCRIPTSCAN_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(Self::find_config_file);

        let mut config = match config_path {
            Some(ref path) if path.exists() => {
                eprintln!("[CONFIG] Loading configuration from: {:?}", path);
                Self::from_file(path)?
            }
            Some(ref path) => {
                eprintln!("[CONFIG] Config file not found: {:?}, using defaults", path);
                AppConfig::default()
            }
            None => {
                eprintln!("[CONFIG] No config file found, using defaults");
                AppConfig::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parse a YAML configuration file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_norway::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Find the configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            PathBuf::from("config.yaml"),
            PathBuf::from("config/config.yaml"),
            PathBuf::from("/etc/scriptscan/config.yaml"),
            dirs::config_dir()
                .map(|p| p.join("scriptscan/config.yaml"))
                .unwrap_or_default(),
        ];

        paths.into_iter().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SCRIPTSCAN_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("SCRIPTSCAN_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(emails) = std::env::var("SCRIPTSCAN_ADMIN_EMAILS") {
            self.auth.admin_emails = emails
                .split(',')
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect();
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SCRIPTSCAN_LOG_FORMAT") {
            self.logging.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" => LogFormat::Compact,
                _ => LogFormat::Pretty,
            };
        }

        if let Ok(url) = std::env::var("GEMINI_BASE_URL") {
            self.ocr.base_url = url;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self.ocr.model = model;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.len() < 32 {
            anyhow::bail!("JWT secret must be at least 32 characters long");
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.server.max_upload_bytes == 0 {
            anyhow::bail!("Upload limit cannot be 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.quota.free_max_scans < 1 {
            anyhow::bail!("Free tier must allow at least one scan");
        }

        if self.quota.premium_max_scans < self.quota.free_max_scans {
            anyhow::bail!("Premium scan limit cannot be lower than the free limit");
        }

        if self.ocr.base_url.is_empty() || self.ocr.model.is_empty() {
            anyhow::bail!("OCR base URL and model must be set");
        }

        if let Some(ref tls) = self.server.tls {
            if !tls.cert_file.exists() {
                anyhow::bail!("TLS certificate file not found: {:?}", tls.cert_file);
            }
            if !tls.key_file.exists() {
                anyhow::bail!("TLS key file not found: {:?}", tls.key_file);
            }
            if tls.min_version != "1.2" && tls.min_version != "1.3" {
                anyhow::bail!(
                    "Invalid TLS minimum version: {}. Must be '1.2' or '1.3'",
                    tls.min_version
                );
            }
        }

        if let Some(ref static_dir) = self.server.static_dir {
            if !static_dir.exists() {
                tracing::warn!(
                    "Static directory does not exist: {:?}. Client will not be served.",
                    static_dir
                );
            }
        }

        Ok(())
    }

    /// Write the default configuration to a file
    pub fn create_default_config(path: &PathBuf) -> Result<()> {
        let config = AppConfig::default();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_norway::to_string(&config)?;
        std::fs::write(path, yaml)?;

        Ok(())
    }
}
