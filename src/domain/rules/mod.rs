// Domain rules - Filename derivation and validation policies

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Rules for naming and validating the files a command reads and writes
pub struct FilenameRules;

impl FilenameRules {
    /// Remove the `\` characters terminals insert when a URL is pasted
    pub fn strip_escape_characters(url: &str) -> String {
        url.replace('\\', "")
    }

    /// Remove the bracketed tokens (e.g. ` [dQw4w9WgXcQ]`) the downloader
    /// puts in filenames
    pub fn strip_bracketed_characters(text: &str) -> String {
        static BRACKETED: OnceLock<Regex> = OnceLock::new();
        let pattern =
            BRACKETED.get_or_init(|| Regex::new(r"\s?\[.+\]").expect("valid bracket pattern"));
        pattern.replace_all(text, "").into_owned()
    }

    /// Fail unless the name ends in the approved output extension
    pub fn check_valid_file_extension(filename: &str) -> Result<(), DomainError> {
        let has_extension = Path::new(filename)
            .extension()
            .map(|ext| ext == OUTPUT_FILE_FORMAT)
            .unwrap_or(false);

        if !has_extension {
            return Err(DomainError::InvalidExtension {
                path: filename.to_string(),
                expected: OUTPUT_FILE_EXTENSION.to_string(),
            });
        }
        Ok(())
    }

    /// `baz` for `foo/bar/baz.mp4`
    pub fn filename_without_extension(filename: &str) -> String {
        Path::new(filename)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Same path with the output extension in place of the current one
    pub fn with_output_extension(filename: &str) -> String {
        Path::new(filename)
            .with_extension(OUTPUT_FILE_FORMAT)
            .to_string_lossy()
            .to_string()
    }

    /// Append the descriptor to a filename: `foo/bar.webm` becomes
    /// `foo/bar - trimmed.mp4`. An empty descriptor leaves the name as is.
    pub fn effective_filename(filename: &str, descriptor: &str) -> String {
        if descriptor.is_empty() {
            return filename.to_string();
        }

        let truncated = Path::new(filename).with_extension("");
        format!(
            "{} - {}{}",
            truncated.to_string_lossy(),
            descriptor,
            OUTPUT_FILE_EXTENSION
        )
    }

    /// Default merge output: `a - b - c.mp4` for clips `a.mp4 b.mkv c.mp4`
    pub fn concatenated_clip_names<S: AsRef<str>>(clip_names: &[S]) -> String {
        let stems: Vec<String> = clip_names
            .iter()
            .map(|name| Self::filename_without_extension(name.as_ref()))
            .collect();
        format!("{}{}", stems.join(" - "), OUTPUT_FILE_EXTENSION)
    }
}

/// Extracts the name of the downloaded file from the downloader's log
pub struct DownloadLogParser;

impl DownloadLogParser {
    /// Find the file the downloader produced.
    ///
    /// A merged file (separate video and audio joined by ffmpeg) wins over
    /// the per-format destination lines that precede it.
    pub fn filename_from_logs(download_logs: &str) -> Option<String> {
        static MERGED: OnceLock<Regex> = OnceLock::new();
        static SINGLE: OnceLock<Regex> = OnceLock::new();

        let merged = MERGED.get_or_init(|| {
            Regex::new(
                r#"(\[ffmpeg\])? Merging formats into "(.+)"|\[download\] (.+) has already been downloaded and merged"#,
            )
            .expect("valid merge pattern")
        });
        if let Some(captures) = merged.captures(download_logs) {
            if let Some(name) = captures.get(2).or_else(|| captures.get(3)) {
                return Some(name.as_str().to_string());
            }
        }

        let single = SINGLE.get_or_init(|| {
            Regex::new(r"\[download\] (Destination: (.+)|(.+) has already been downloaded)")
                .expect("valid destination pattern")
        });
        single
            .captures(download_logs)
            .and_then(|captures| captures.get(2).or_else(|| captures.get(3)))
            .map(|name| name.as_str().to_string())
    }
}
