//! yt-dlp download adapter
//!
//! Runs the downloader in the working directory and reads the resulting
//! filename back out of its log.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::DownloadLogParser;
use crate::error::LotcError;
use crate::ports::*;

/// Downloader adapter backed by the `yt-dlp` executable
pub struct YtDlpAdapter {
    program: String,
}

impl YtDlpAdapter {
    /// Create new adapter running the given downloader executable
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed to the downloader for a URL
    pub fn download_args(url: &str) -> Vec<String> {
        vec!["--verbose".to_string(), url.to_string()]
    }

    /// Turn the downloader's captured output into the downloaded filename
    pub fn filename_from_output(stdout: &[u8], stderr: &[u8]) -> Result<String, DomainError> {
        let logs = format!(
            "{}\n{}",
            String::from_utf8_lossy(stdout),
            String::from_utf8_lossy(stderr)
        );

        DownloadLogParser::filename_from_logs(&logs).ok_or_else(|| {
            DomainError::DownloadFailed(
                "could not find the downloaded filename in the downloader output".to_string(),
            )
        })
    }
}

#[async_trait]
impl DownloadPort for YtDlpAdapter {
    async fn download(&self, url: &str) -> Result<DownloadedVideo, DomainError> {
        info!("Downloading {} with {}", url, self.program);

        let output = Command::new(&self.program)
            .args(Self::download_args(url))
            .output()
            .await
            .map_err(|source| {
                LotcError::SpawnError {
                    program: self.program.clone(),
                    source,
                }
                .into_download_error()
            })?;

        debug!("{} stdout:\n{}", self.program, String::from_utf8_lossy(&output.stdout));

        if !output.status.success() {
            return Err(LotcError::ProcessFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into_download_error());
        }

        let filename = Self::filename_from_output(&output.stdout, &output.stderr)?;
        info!("Downloaded {}", filename);

        Ok(DownloadedVideo {
            filename,
            used_fallback: false,
        })
    }
}
