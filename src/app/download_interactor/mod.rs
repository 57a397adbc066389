// Download interactor - Fetches a video, then trims or converts it

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::{clips_from_ranges, log_output_size, range_labels};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor for the download command
pub struct DownloadInteractor {
    download_port: Arc<dyn DownloadPort>,
    fallback_port: Option<Arc<dyn DownloadPort>>,
    edit_port: Arc<dyn EditPort>,
    fs_port: Arc<dyn FsPort>,
    report_port: Arc<dyn ReportPort>,
    descriptor: String,
}

impl DownloadInteractor {
    /// Create new download interactor with injected ports.
    ///
    /// `fallback_port` is tried for Facebook URLs when the primary
    /// downloader fails.
    pub fn new(
        download_port: Arc<dyn DownloadPort>,
        fallback_port: Option<Arc<dyn DownloadPort>>,
        edit_port: Arc<dyn EditPort>,
        fs_port: Arc<dyn FsPort>,
        report_port: Arc<dyn ReportPort>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self {
            download_port,
            fallback_port,
            edit_port,
            fs_port,
            report_port,
            descriptor: descriptor.into(),
        }
    }

    pub async fn execute(&self, request: DownloadRequest) -> Result<CommandOutcome, DomainError> {
        if let Some(output) = &request.output {
            FilenameRules::check_valid_file_extension(output)?;
        }
        // Malformed ranges fail before anything is fetched
        let ranges = TimestampRange::parse_all(&request.timestamps)?;

        self.report_port.step("Downloading the video...").await;
        let url = FilenameRules::strip_escape_characters(&request.url);
        let downloaded = self.download(&url).await?;
        info!(
            file = %downloaded.filename,
            fallback = downloaded.used_fallback,
            "Download complete"
        );

        let output_file = if ranges.is_empty() {
            self.keep_full_video(&downloaded.filename, request.output.as_deref())
                .await?
        } else {
            self.trim_download(&downloaded.filename, &ranges, request.output.as_deref())
                .await?
        };

        log_output_size(self.fs_port.as_ref(), &output_file).await;
        self.report_port.saved(&output_file).await;
        Ok(CommandOutcome::Saved { output_file })
    }

    async fn download(&self, url: &str) -> Result<DownloadedVideo, DomainError> {
        match self.download_port.download(url).await {
            Ok(video) => Ok(video),
            Err(DomainError::DownloadFailed(reason)) if url.contains("facebook") => {
                let Some(fallback) = &self.fallback_port else {
                    return Err(DomainError::DownloadFailed(reason));
                };
                warn!(%reason, "Primary downloader failed");
                self.report_port
                    .warning("Encountered error while downloading the video!")
                    .await;
                self.report_port
                    .warning("Trying the alternative FB video downloader...")
                    .await;
                fallback.download(url).await
            }
            Err(e) => Err(e),
        }
    }

    async fn trim_download(
        &self,
        filename: &str,
        ranges: &[TimestampRange],
        output: Option<&str>,
    ) -> Result<String, DomainError> {
        self.report_port
            .step("Trimming the video with these durations:")
            .await;
        self.report_port.tree(&range_labels(ranges)).await;

        let descriptor = if output.is_some() {
            ""
        } else {
            self.descriptor.as_str()
        };
        let clips = clips_from_ranges(self.edit_port.as_ref(), filename, ranges).await?;
        let base = FilenameRules::strip_bracketed_characters(output.unwrap_or(filename));
        let output_file = FilenameRules::effective_filename(&base, descriptor);
        debug!(source = %filename, output = %output_file, "Rendering downloaded clips");

        self.edit_port
            .concatenate_and_write(&clips, &output_file)
            .await?;
        if output_file != filename {
            self.fs_port.delete_file(filename).await?;
        }
        Ok(output_file)
    }

    async fn keep_full_video(&self, filename: &str, output: Option<&str>) -> Result<String, DomainError> {
        let output_file = if FilenameRules::check_valid_file_extension(filename).is_err() {
            self.report_port.step("Converting to mp4...").await;
            let target = output
                .map(str::to_string)
                .unwrap_or_else(|| FilenameRules::with_output_extension(filename));
            let output_file = FilenameRules::strip_bracketed_characters(&target);

            let clip = self.edit_port.load(filename).await?;
            self.edit_port.write(&clip, &output_file).await?;
            self.fs_port.delete_file(filename).await?;
            output_file
        } else {
            let output_file = FilenameRules::strip_bracketed_characters(output.unwrap_or(filename));
            if output_file != filename {
                self.fs_port.move_file(filename, &output_file).await?;
            }
            output_file
        };

        self.report_port
            .step("There's no specified duration(s). The full video is downloaded.")
            .await;
        Ok(output_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fakes::*;

    const URL: &str = "https://www.youtube.com/watch?v=jSRHpA2giUk";

    struct Harness {
        fs: Arc<FakeFs>,
        editor: Arc<FakeEditor>,
        report: Arc<RecordingReport>,
    }

    impl Harness {
        fn new() -> Self {
            let fs = FakeFs::with_files(&[]);
            Self {
                editor: FakeEditor::new(fs.clone()),
                report: RecordingReport::new(),
                fs,
            }
        }

        fn interactor(
            &self,
            downloader: Arc<FakeDownloader>,
            fallback: Option<Arc<FakeDownloader>>,
        ) -> DownloadInteractor {
            DownloadInteractor::new(
                downloader,
                fallback.map(|f| f as Arc<dyn DownloadPort>),
                self.editor.clone(),
                self.fs.clone(),
                self.report.clone(),
                DEFAULT_DESCRIPTOR,
            )
        }
    }

    fn request(url: &str, timestamps: &[&str], output: Option<&str>) -> DownloadRequest {
        DownloadRequest {
            url: url.to_string(),
            timestamps: timestamps.iter().map(|t| t.to_string()).collect(),
            output: output.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_download_and_trim() {
        let h = Harness::new();
        let downloader = FakeDownloader::producing(h.fs.clone(), "Clip Title [jSRHpA2giUk].mkv");
        let interactor = h.interactor(downloader, None);

        let outcome = interactor
            .execute(request(URL, &["0:30-0:45", "1:10-1:40"], None))
            .await
            .unwrap();

        assert_eq!(outcome.output_file(), Some("Clip Title - trimmed.mp4"));
        let renders = h.editor.renders();
        assert_eq!(renders.len(), 1);
        assert_eq!(renders[0].clips.len(), 2);
        assert!(renders[0]
            .clips
            .iter()
            .all(|c| c.source == "Clip Title [jSRHpA2giUk].mkv"));

        // The downloaded original is removed
        assert!(!h.fs.contains("Clip Title [jSRHpA2giUk].mkv"));
        assert!(h.fs.contains("Clip Title - trimmed.mp4"));

        assert_eq!(
            h.report.lines(),
            vec![
                "Downloading the video...",
                "Trimming the video with these durations:",
                "- 0:30-0:45",
                "- 1:10-1:40",
                "saved: Clip Title - trimmed.mp4",
            ]
        );
    }

    #[tokio::test]
    async fn test_download_and_trim_with_output() {
        let h = Harness::new();
        let downloader = FakeDownloader::producing(h.fs.clone(), "Clip [id].mp4");
        let interactor = h.interactor(downloader, None);

        let outcome = interactor
            .execute(request(URL, &["5-10"], Some("best part.mp4")))
            .await
            .unwrap();

        assert_eq!(outcome.output_file(), Some("best part.mp4"));
        assert!(!h.fs.contains("Clip [id].mp4"));
    }

    #[tokio::test]
    async fn test_download_strips_escape_characters() {
        let h = Harness::new();
        let downloader = FakeDownloader::producing(h.fs.clone(), "Clip [id].mp4");
        let interactor = h.interactor(downloader.clone(), None);

        interactor
            .execute(request(r"https://www.youtube.com/watch\?v\=jSRHpA2giUk", &[], None))
            .await
            .unwrap();

        assert_eq!(downloader.urls(), vec![URL]);
    }

    #[tokio::test]
    async fn test_download_full_mp4_is_renamed() {
        let h = Harness::new();
        let downloader = FakeDownloader::producing(h.fs.clone(), "Clip Title [id].mp4");
        let interactor = h.interactor(downloader, None);

        let outcome = interactor.execute(request(URL, &[], None)).await.unwrap();

        assert_eq!(outcome.output_file(), Some("Clip Title.mp4"));
        assert_eq!(
            *h.fs.moved.lock().unwrap(),
            vec![("Clip Title [id].mp4".to_string(), "Clip Title.mp4".to_string())]
        );
        assert!(h.editor.renders().is_empty());
        assert_eq!(
            h.report.lines(),
            vec![
                "Downloading the video...",
                "There's no specified duration(s). The full video is downloaded.",
                "saved: Clip Title.mp4",
            ]
        );
    }

    #[tokio::test]
    async fn test_download_full_mp4_already_named() {
        let h = Harness::new();
        let downloader = FakeDownloader::producing(h.fs.clone(), "plain.mp4");
        let interactor = h.interactor(downloader, None);

        let outcome = interactor.execute(request(URL, &[], None)).await.unwrap();

        assert_eq!(outcome.output_file(), Some("plain.mp4"));
        assert!(h.fs.moved.lock().unwrap().is_empty());
        assert!(h.fs.contains("plain.mp4"));
    }

    #[tokio::test]
    async fn test_download_full_non_mp4_is_converted() {
        let h = Harness::new();
        let downloader = FakeDownloader::producing(h.fs.clone(), "Clip Title [id].webm");
        let interactor = h.interactor(downloader, None);

        let outcome = interactor.execute(request(URL, &[], None)).await.unwrap();

        assert_eq!(outcome.output_file(), Some("Clip Title.mp4"));
        let renders = h.editor.renders();
        assert_eq!(renders.len(), 1);
        assert_eq!(renders[0].output, "Clip Title.mp4");
        assert!(renders[0].clips[0].is_full());
        assert_eq!(
            *h.fs.deleted.lock().unwrap(),
            vec!["Clip Title [id].webm".to_string()]
        );
        assert_eq!(
            h.report.lines(),
            vec![
                "Downloading the video...",
                "Converting to mp4...",
                "There's no specified duration(s). The full video is downloaded.",
                "saved: Clip Title.mp4",
            ]
        );
    }

    #[tokio::test]
    async fn test_download_rejects_bad_output_before_fetching() {
        let h = Harness::new();
        let downloader = FakeDownloader::producing(h.fs.clone(), "x.mp4");
        let interactor = h.interactor(downloader.clone(), None);

        let err = interactor
            .execute(request(URL, &[], Some("out.mkv")))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidExtension { .. }));
        assert!(downloader.urls().is_empty());
        assert!(h.report.lines().is_empty());
    }

    #[tokio::test]
    async fn test_download_rejects_bad_timestamp_before_fetching() {
        let h = Harness::new();
        let downloader = FakeDownloader::producing(h.fs.clone(), "x.mp4");
        let interactor = h.interactor(downloader.clone(), None);

        let err = interactor
            .execute(request(URL, &["1:00"], None))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidTimestamp(_)));
        assert!(downloader.urls().is_empty());
    }

    #[tokio::test]
    async fn test_download_failure_is_fatal() {
        let h = Harness::new();
        let downloader = FakeDownloader::failing(h.fs.clone(), "ERROR: Unsupported URL");
        let fallback = FakeDownloader::as_fallback(h.fs.clone(), "123.mp4");
        let interactor = h.interactor(downloader, Some(fallback.clone()));

        let err = interactor
            .execute(request("https://example.com/v", &[], None))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::DownloadFailed("ERROR: Unsupported URL".to_string())
        );
        assert!(fallback.urls().is_empty());
    }

    #[tokio::test]
    async fn test_facebook_failure_uses_fallback() {
        let h = Harness::new();
        let url = "https://www.facebook.com/watch/?v=1234567890";
        let downloader = FakeDownloader::failing(h.fs.clone(), "ERROR: login required");
        let fallback = FakeDownloader::as_fallback(h.fs.clone(), "1234567890.mp4");
        let interactor = h.interactor(downloader, Some(fallback.clone()));

        let outcome = interactor.execute(request(url, &[], None)).await.unwrap();

        assert_eq!(outcome.output_file(), Some("1234567890.mp4"));
        assert_eq!(fallback.urls(), vec![url]);
        assert_eq!(
            h.report.lines(),
            vec![
                "Downloading the video...",
                "warning: Encountered error while downloading the video!",
                "warning: Trying the alternative FB video downloader...",
                "There's no specified duration(s). The full video is downloaded.",
                "saved: 1234567890.mp4",
            ]
        );
    }

    #[tokio::test]
    async fn test_facebook_failure_without_fallback() {
        let h = Harness::new();
        let downloader = FakeDownloader::failing(h.fs.clone(), "ERROR: login required");
        let interactor = h.interactor(downloader, None);

        let err = interactor
            .execute(request("https://www.facebook.com/watch/?v=1", &[], None))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::DownloadFailed(_)));
    }
}
