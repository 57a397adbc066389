// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// File not found
    FileNotFound(String),
    /// Output file does not carry the approved extension
    InvalidExtension { path: String, expected: String },
    /// Malformed timestamp or timestamp range
    InvalidTimestamp(String),
    /// The downloader failed or its output could not be understood
    DownloadFailed(String),
    /// The video editor failed
    EditFailed(String),
    /// File system operation failed
    FsFail(String),
    /// Configuration could not be loaded or is invalid
    ConfigError(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FileNotFound(path) => write!(f, "\"{}\" could not be found!", path),
            DomainError::InvalidExtension { path, expected } => {
                write!(f, "\"{}\" must be in \"{}\" format!", path, expected)
            }
            DomainError::InvalidTimestamp(msg) => write!(f, "Invalid timestamp: {}", msg),
            DomainError::DownloadFailed(msg) => write!(f, "Download failed: {}", msg),
            DomainError::EditFailed(msg) => write!(f, "Video editing failed: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
