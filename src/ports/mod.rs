// Ports - Interface definitions (contracts)

use crate::domain::errors::*;
use crate::domain::model::*;
use async_trait::async_trait;

/// Port for fetching a video from a URL into a local file
#[async_trait]
pub trait DownloadPort: Send + Sync {
    /// Download the video at `url` into the working directory
    async fn download(&self, url: &str) -> Result<DownloadedVideo, DomainError>;
}

/// Port for the video editor: load, cut, concatenate and write clips
#[async_trait]
pub trait EditPort: Send + Sync {
    /// Load a video file as a clip
    async fn load(&self, file_path: &str) -> Result<Clip, DomainError>;

    /// Cut a sub-range out of a loaded clip. Nothing is rendered until a
    /// write.
    fn subclip(&self, clip: &Clip, range: TimestampRange) -> Clip {
        clip.subclip(range)
    }

    /// Render a single clip to `output`
    async fn write(&self, clip: &Clip, output: &str) -> Result<(), DomainError>;

    /// Join clips in the given order and render the result to `output`
    async fn concatenate_and_write(&self, clips: &[Clip], output: &str) -> Result<(), DomainError>;

    /// Combine a video-only file and an audio-only file
    async fn mux(&self, video: &str, audio: &str, output: &str) -> Result<(), DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, file_path: &str) -> Result<bool, DomainError>;

    /// Get file size
    async fn get_file_size(&self, file_path: &str) -> Result<u64, DomainError>;

    /// Delete file
    async fn delete_file(&self, file_path: &str) -> Result<(), DomainError>;

    /// Move file, replacing the destination
    async fn move_file(&self, from: &str, to: &str) -> Result<(), DomainError>;
}

/// Port for configuration management
#[async_trait]
pub trait ConfigPort: Send + Sync {
    /// Get configuration value
    async fn get_config(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Get configuration value with default
    async fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, DomainError>;

    /// Get a boolean configuration value with default
    async fn get_bool_or_default(&self, key: &str, default: bool) -> Result<bool, DomainError> {
        match self.get_config(key).await? {
            Some(value) => value.parse::<bool>().map_err(|e| {
                DomainError::ConfigError(format!("Invalid boolean value for {}: {}", key, e))
            }),
            None => Ok(default),
        }
    }

    /// Set configuration value
    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Load configuration from file
    async fn load_config(&self, file_path: &str) -> Result<(), DomainError>;

    /// Validate configuration
    async fn validate_config(&self) -> Result<(), DomainError>;

    /// Get all configuration keys
    async fn get_all_config_keys(&self) -> Result<Vec<String>, DomainError>;

    /// Get configuration file path
    async fn get_config_file_path(&self) -> Result<Option<String>, DomainError>;
}

/// Port for user-facing progress output
#[async_trait]
pub trait ReportPort: Send + Sync {
    /// Report a step the command is about to take
    async fn step(&self, message: &str);

    /// Report something that went wrong but is being handled
    async fn warning(&self, message: &str);

    /// Report a list of items (timestamps, clips) as a tree
    async fn tree(&self, branches: &[String]);

    /// Report the file a command produced
    async fn saved(&self, output_file: &str);
}
