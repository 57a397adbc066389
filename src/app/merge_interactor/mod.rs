// Merge interactor - Joins whole clips in argument order

use std::sync::Arc;

use tracing::info;

use crate::app::{ensure_exists, log_output_size};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor for the merge command
pub struct MergeInteractor {
    edit_port: Arc<dyn EditPort>,
    fs_port: Arc<dyn FsPort>,
    report_port: Arc<dyn ReportPort>,
}

impl MergeInteractor {
    /// Create new merge interactor with injected ports
    pub fn new(
        edit_port: Arc<dyn EditPort>,
        fs_port: Arc<dyn FsPort>,
        report_port: Arc<dyn ReportPort>,
    ) -> Self {
        Self {
            edit_port,
            fs_port,
            report_port,
        }
    }

    pub async fn execute(&self, request: MergeRequest) -> Result<CommandOutcome, DomainError> {
        if let Some(output) = &request.output {
            FilenameRules::check_valid_file_extension(output)?;
        }
        if request.clips.is_empty() {
            return Err(DomainError::BadArgs(
                "At least one clip is required to merge".to_string(),
            ));
        }

        self.report_port.step("Merging these video clips:").await;
        self.report_port.tree(&request.clips).await;

        for clip in &request.clips {
            ensure_exists(self.fs_port.as_ref(), clip).await?;
        }

        let mut clips = Vec::with_capacity(request.clips.len());
        for clip in &request.clips {
            clips.push(self.edit_port.load(clip).await?);
        }

        let output_file = match request.output {
            Some(output) => output,
            None => FilenameRules::concatenated_clip_names(&request.clips),
        };
        self.edit_port
            .concatenate_and_write(&clips, &output_file)
            .await?;
        info!(output = %output_file, clips = clips.len(), "Merge complete");
        log_output_size(self.fs_port.as_ref(), &output_file).await;
        self.report_port.saved(&output_file).await;

        Ok(CommandOutcome::Saved { output_file })
    }
}
