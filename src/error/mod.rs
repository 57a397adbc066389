//! Error handling module for lotc adapters

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Infrastructure errors raised while talking to external programs and services
#[derive(Error, Debug)]
pub enum LotcError {
    /// An external program could not be started
    #[error("Failed to run {program}: {source}")]
    SpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An external program exited unsuccessfully
    #[error("{program} exited with {status}: {stderr}")]
    ProcessFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Probe output could not be interpreted
    #[error("Failed to probe media file: {message}")]
    ProbeError { message: String },

    /// Page scraping found nothing usable
    #[error("Failed to scrape video page: {message}")]
    ScrapeError { message: String },

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Result type alias for adapter operations
pub type LotcResult<T> = std::result::Result<T, LotcError>;

impl LotcError {
    /// Map into the download failure category
    pub fn into_download_error(self) -> DomainError {
        DomainError::DownloadFailed(self.to_string())
    }

    /// Map into the editor failure category
    pub fn into_edit_error(self) -> DomainError {
        DomainError::EditFailed(self.to_string())
    }
}

impl From<LotcError> for DomainError {
    fn from(err: LotcError) -> Self {
        match err {
            LotcError::IoError(e) => DomainError::FsFail(e.to_string()),
            LotcError::ConfigParse(e) => DomainError::ConfigError(e.to_string()),
            LotcError::HttpError(e) => DomainError::DownloadFailed(e.to_string()),
            LotcError::ScrapeError { message } => DomainError::DownloadFailed(message),
            other => DomainError::EditFailed(other.to_string()),
        }
    }
}
