use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::adapters::{
    ConsoleReportAdapter, FacebookScraperAdapter, FfmpegEditAdapter, FfmpegSettings, FsStdAdapter,
    YtDlpAdapter,
};
use crate::app::{
    download_interactor::DownloadInteractor, merge_interactor::MergeInteractor,
    trim_interactor::TrimInteractor,
};
use crate::domain::errors::DomainError;
use crate::domain::model::DEFAULT_DESCRIPTOR;
use crate::ports::{ConfigPort, DownloadPort, EditPort, FsPort, ReportPort};

pub trait AppContainer: Send + Sync {
    fn download_interactor(&self) -> Arc<DownloadInteractor>;
    fn trim_interactor(&self) -> Arc<TrimInteractor>;
    fn merge_interactor(&self) -> Arc<MergeInteractor>;
}

pub struct DefaultAppContainer {
    download_interactor: Arc<DownloadInteractor>,
    trim_interactor: Arc<TrimInteractor>,
    merge_interactor: Arc<MergeInteractor>,
}

impl DefaultAppContainer {
    /// Wire the adapters from an already resolved configuration
    pub async fn from_config(config: Arc<dyn ConfigPort>) -> Result<Self, DomainError> {
        let setting = |key: &'static str, default: &'static str| {
            let config = Arc::clone(&config);
            async move { config.get_config_or_default(key, default).await }
        };

        let settings = FfmpegSettings {
            ffmpeg: setting("ffmpeg", "ffmpeg").await?,
            ffprobe: setting("ffprobe", "ffprobe").await?,
            video_codec: setting("video_codec", "libx264").await?,
            audio_codec: setting("audio_codec", "aac").await?,
        };
        let downloader = setting("downloader", "yt-dlp").await?;
        let descriptor = setting("descriptor", DEFAULT_DESCRIPTOR).await?;
        let use_fallback = config.get_bool_or_default("facebook_fallback", true).await?;
        debug!(?settings, %downloader, %descriptor, use_fallback, "Wiring adapters");

        let edit_port = Arc::new(FfmpegEditAdapter::new(settings)) as Arc<dyn EditPort>;
        let fs_port = Arc::new(FsStdAdapter::new()) as Arc<dyn FsPort>;
        let report_port = Arc::new(ConsoleReportAdapter::new()) as Arc<dyn ReportPort>;
        let download_port = Arc::new(YtDlpAdapter::new(downloader)) as Arc<dyn DownloadPort>;

        let fallback_port = if use_fallback {
            let user_agent = config.get_config("user_agent").await?.unwrap_or_default();
            Some(Arc::new(FacebookScraperAdapter::new(
                Arc::clone(&edit_port),
                user_agent,
                PathBuf::from("."),
            )) as Arc<dyn DownloadPort>)
        } else {
            None
        };

        let download_interactor = Arc::new(DownloadInteractor::new(
            download_port,
            fallback_port,
            Arc::clone(&edit_port),
            Arc::clone(&fs_port),
            Arc::clone(&report_port),
            descriptor.clone(),
        ));

        let trim_interactor = Arc::new(TrimInteractor::new(
            Arc::clone(&edit_port),
            Arc::clone(&fs_port),
            Arc::clone(&report_port),
            descriptor,
        ));

        let merge_interactor = Arc::new(MergeInteractor::new(
            Arc::clone(&edit_port),
            Arc::clone(&fs_port),
            Arc::clone(&report_port),
        ));

        Ok(Self {
            download_interactor,
            trim_interactor,
            merge_interactor,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn download_interactor(&self) -> Arc<DownloadInteractor> {
        Arc::clone(&self.download_interactor)
    }

    fn trim_interactor(&self) -> Arc<TrimInteractor> {
        Arc::clone(&self.trim_interactor)
    }

    fn merge_interactor(&self) -> Arc<MergeInteractor> {
        Arc::clone(&self.merge_interactor)
    }
}
