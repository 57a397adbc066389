// Filesystem adapter - File system operations on the local disk

use crate::domain::errors::*;
use crate::ports::*;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs;

/// Local filesystem adapter
pub struct FsStdAdapter;

impl FsStdAdapter {
    /// Create new filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

impl Default for FsStdAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FsPort for FsStdAdapter {
    async fn file_exists(&self, file_path: &str) -> Result<bool, DomainError> {
        Ok(Path::new(file_path).exists())
    }

    async fn get_file_size(&self, file_path: &str) -> Result<u64, DomainError> {
        let metadata = fs::metadata(file_path)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to get file size: {}", e)))?;
        Ok(metadata.len())
    }

    async fn delete_file(&self, file_path: &str) -> Result<(), DomainError> {
        fs::remove_file(file_path)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to delete {}: {}", file_path, e)))?;
        Ok(())
    }

    async fn move_file(&self, from: &str, to: &str) -> Result<(), DomainError> {
        // Ensure destination directory exists
        if let Some(parent) = Path::new(to).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    DomainError::FsFail(format!("Failed to create directory: {}", e))
                })?;
            }
        }

        fs::rename(from, to).await.map_err(|e| {
            DomainError::FsFail(format!("Failed to move file from {} to {}: {}", from, to, e))
        })?;
        Ok(())
    }
}
