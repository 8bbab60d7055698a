//! Runtime configuration and sheet-service credentials.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable pointing at a credentials JSON file.
pub const CREDENTIALS_FILE_ENV: &str = "PAGELENS_CREDENTIALS_FILE";

/// Environment variable holding the default share recipient.
pub const DEFAULT_EMAIL_ENV: &str = "PAGELENS_DEFAULT_EMAIL";

const DEFAULT_ENDPOINT: &str = "https://sheets.pagelens.dev";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no credentials configured: pass --credentials or set {CREDENTIALS_FILE_ENV}")]
    MissingCredentials,

    #[error("failed to read credentials file {path}: {source}")]
    UnreadableCredentials {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed credentials file {path}: {source}")]
    MalformedCredentials {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no share recipient: pass --share or set {DEFAULT_EMAIL_ENV}")]
    MissingRecipient,
}

/// Settings for a single audit run, assembled once at startup.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub seed: String,
    pub workers: usize,
    pub max_pages: usize,
    pub timeout_secs: u64,
    pub show_progress: bool,
}

impl AuditConfig {
    pub fn new(seed: String) -> Self {
        Self {
            seed,
            workers: 8,
            max_pages: 500,
            timeout_secs: 10,
            show_progress: true,
        }
    }
}

/// Token and endpoint for the sheet publishing service.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub token: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

/// Resolve the credentials file path: an explicit flag wins over the
/// environment. Tilde prefixes are expanded in both cases.
pub fn credentials_path(flag: Option<&str>) -> Result<PathBuf, ConfigError> {
    let raw = match flag {
        Some(p) => p.to_string(),
        None => std::env::var(CREDENTIALS_FILE_ENV).map_err(|_| ConfigError::MissingCredentials)?,
    };
    Ok(PathBuf::from(shellexpand::tilde(&raw).as_ref()))
}

pub fn load_credentials(path: &Path) -> Result<Credentials, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::UnreadableCredentials {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&contents).map_err(|e| ConfigError::MalformedCredentials {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Resolve who the published sheet is shared with: flag first, then the
/// environment default.
pub fn share_recipient(flag: Option<&str>) -> Result<String, ConfigError> {
    if let Some(email) = flag {
        return Ok(email.to_string());
    }
    std::env::var(DEFAULT_EMAIL_ENV).map_err(|_| ConfigError::MissingRecipient)
}
