// Trim interactor - Cuts ranges out of a local video

use std::sync::Arc;

use tracing::{debug, info};

use crate::app::{clips_from_ranges, ensure_exists, log_output_size, range_labels};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor for the trim command
pub struct TrimInteractor {
    edit_port: Arc<dyn EditPort>,
    fs_port: Arc<dyn FsPort>,
    report_port: Arc<dyn ReportPort>,
    descriptor: String,
}

impl TrimInteractor {
    /// Create new trim interactor with injected ports
    pub fn new(
        edit_port: Arc<dyn EditPort>,
        fs_port: Arc<dyn FsPort>,
        report_port: Arc<dyn ReportPort>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self {
            edit_port,
            fs_port,
            report_port,
            descriptor: descriptor.into(),
        }
    }

    /// Trim `request.input` to the requested ranges, joined in order.
    /// The input file itself is never modified.
    pub async fn execute(&self, request: TrimRequest) -> Result<CommandOutcome, DomainError> {
        if let Some(output) = &request.output {
            FilenameRules::check_valid_file_extension(output)?;
        }

        if request.timestamps.is_empty() {
            self.report_port
                .step(&format!(
                    "There's no specified duration(s). The {} will not be trimmed.",
                    request.input
                ))
                .await;
            return Ok(CommandOutcome::Untouched {
                input: request.input,
            });
        }

        let ranges = TimestampRange::parse_all(&request.timestamps)?;
        self.report_port
            .step("Trimming the video with these durations:")
            .await;
        self.report_port.tree(&range_labels(&ranges)).await;

        ensure_exists(self.fs_port.as_ref(), &request.input).await?;

        // An explicit output name is used as given
        let descriptor = if request.output.is_some() {
            ""
        } else {
            self.descriptor.as_str()
        };
        let clips = clips_from_ranges(self.edit_port.as_ref(), &request.input, &ranges).await?;
        let base = request.output.as_deref().unwrap_or(&request.input);
        let output_file = FilenameRules::effective_filename(base, descriptor);
        debug!(input = %request.input, output = %output_file, clips = clips.len(), "Rendering trim");

        self.edit_port
            .concatenate_and_write(&clips, &output_file)
            .await?;
        info!(output = %output_file, "Trim complete");
        log_output_size(self.fs_port.as_ref(), &output_file).await;
        self.report_port.saved(&output_file).await;

        Ok(CommandOutcome::Saved { output_file })
    }
}
