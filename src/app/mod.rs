// Application layer - Use case interactors

pub mod container;
pub mod download_interactor;
pub mod merge_interactor;
pub mod trim_interactor;

#[cfg(test)]
pub(crate) mod fakes;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use download_interactor::DownloadInteractor;
pub use merge_interactor::MergeInteractor;
pub use trim_interactor::TrimInteractor;

use crate::domain::errors::DomainError;
use crate::domain::model::{Clip, TimestampRange};
use crate::ports::{EditPort, FsPort};
use crate::utils::Utils;
use tracing::{debug, warn};

/// Fail with `FileNotFound` unless the file exists
pub(crate) async fn ensure_exists(fs_port: &dyn FsPort, file_path: &str) -> Result<(), DomainError> {
    if !fs_port.file_exists(file_path).await? {
        return Err(DomainError::FileNotFound(file_path.to_string()));
    }
    Ok(())
}

/// Load `source` once and cut one clip per range, in order
pub(crate) async fn clips_from_ranges(
    edit_port: &dyn EditPort,
    source: &str,
    ranges: &[TimestampRange],
) -> Result<Vec<Clip>, DomainError> {
    let main_clip = edit_port.load(source).await?;
    Ok(ranges
        .iter()
        .map(|range| edit_port.subclip(&main_clip, range.clone()))
        .collect())
}

/// Log the size of a freshly written file. A failed lookup is only logged.
pub(crate) async fn log_output_size(fs_port: &dyn FsPort, output_file: &str) {
    match fs_port.get_file_size(output_file).await {
        Ok(size) => debug!(output = %output_file, size = %Utils::format_file_size(size), "Output written"),
        Err(e) => warn!(output = %output_file, error = %e, "Could not stat output"),
    }
}

/// Branch labels for the progress tree
pub(crate) fn range_labels(ranges: &[TimestampRange]) -> Vec<String> {
    ranges.iter().map(ToString::to_string).collect()
}
