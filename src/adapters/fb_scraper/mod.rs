//! Facebook page scraper used when the downloader fails on a Facebook URL.
//!
//! Facebook serves video and audio as separate progressive files whose URLs
//! are embedded (escaped) in the watch page. The best video rendition and
//! the audio track are fetched into a temporary directory and muxed into
//! `<video id>.mp4` in the working directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::error::{LotcError, LotcResult};
use crate::ports::*;

/// Matches an escaped `https:\/\/video...oe=...` media URL
const MEDIA_URL_PATTERN: &str = r".+?(https:\\/\\/video.+?oe=[A-Za-z0-9]+)";

/// Fallback downloader scraping the Facebook watch page
pub struct FacebookScraperAdapter {
    client: Client,
    editor: Arc<dyn EditPort>,
    user_agent: String,
    work_dir: PathBuf,
}

impl FacebookScraperAdapter {
    /// Create new scraper that muxes through `editor` into `work_dir`
    pub fn new(editor: Arc<dyn EditPort>, user_agent: impl Into<String>, work_dir: PathBuf) -> Self {
        Self {
            client: Client::new(),
            editor,
            user_agent: user_agent.into(),
            work_dir,
        }
    }

    /// First run of digits in the URL
    pub fn video_id(url: &str) -> LotcResult<String> {
        static DIGITS: OnceLock<Regex> = OnceLock::new();
        let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("valid digits pattern"));
        digits
            .find(url)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| LotcError::ScrapeError {
                message: format!("no video id in {}", url),
            })
    }

    /// The part of the page describing the given video
    pub fn video_html<'a>(page_html: &'a str, video_id: &str) -> LotcResult<&'a str> {
        let pattern = Regex::new(&format!(
            r#""id":"{id}".+?{id}"#,
            id = regex::escape(video_id)
        ))
        .map_err(|e| LotcError::ScrapeError {
            message: e.to_string(),
        })?;

        pattern
            .find(page_html)
            .map(|m| m.as_str())
            .ok_or_else(|| LotcError::ScrapeError {
                message: format!("video {} not found in page", video_id),
            })
    }

    /// Video URLs keyed by vertical resolution
    pub fn video_links(video_html: &str) -> BTreeMap<u32, String> {
        static LINKS: OnceLock<Regex> = OnceLock::new();
        let links = LINKS.get_or_init(|| {
            Regex::new(&format!(r#"(FBQualityLabel=\\"(\d+)p){}"#, MEDIA_URL_PATTERN))
                .expect("valid quality pattern")
        });

        links
            .captures_iter(video_html)
            .filter_map(|cap| {
                let resolution = cap[2].parse::<u32>().ok()?;
                Some((resolution, Self::strip_special_url_characters(&cap[3])))
            })
            .collect()
    }

    /// URL of the separate audio track
    pub fn audio_link(video_html: &str) -> LotcResult<String> {
        static AUDIO: OnceLock<Regex> = OnceLock::new();
        let audio = AUDIO.get_or_init(|| {
            Regex::new(&format!("audio_channel_configuration{}", MEDIA_URL_PATTERN))
                .expect("valid audio pattern")
        });

        audio
            .captures(video_html)
            .map(|cap| Self::strip_special_url_characters(&cap[1]))
            .ok_or_else(|| LotcError::ScrapeError {
                message: "no audio track found".to_string(),
            })
    }

    /// Undo the page's HTML and JSON escaping of a URL
    pub fn strip_special_url_characters(url: &str) -> String {
        url.replace("amp;", "").replace('\\', "")
    }

    /// Last path segment of a URL, used as the local filename
    pub fn filename_from_url(url: &str) -> LotcResult<String> {
        let parsed = Url::parse(url).map_err(|e| LotcError::ScrapeError {
            message: format!("bad media URL {}: {}", url, e),
        })?;
        parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .map(|name| name.to_string())
            .ok_or_else(|| LotcError::ScrapeError {
                message: format!("media URL has no filename: {}", url),
            })
    }

    /// Browser-like headers; Facebook serves a stripped page otherwise
    fn request_headers(&self) -> HeaderMap {
        let token = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
            .to_string();

        let pairs: [(&'static str, &str); 11] = [
            ("authority", "www.facebook.com"),
            (
                "accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
            ("accept-language", "en,en-US;q=0.9"),
            ("cache-control", "max-age=0"),
            ("sec-fetch-dest", "document"),
            ("sec-fetch-mode", "navigate"),
            ("sec-fetch-site", "none"),
            ("sec-fetch-user", "?1"),
            ("upgrade-insecure-requests", "1"),
            ("user-agent", self.user_agent.as_str()),
            ("x-token", token.as_str()),
        ];

        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(HeaderName::from_static(name), value);
            }
        }
        headers
    }

    async fn video_and_audio_links(&self, url: &str, video_id: &str) -> LotcResult<(String, String)> {
        let page = self
            .client
            .get(url)
            .headers(self.request_headers())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let html = Self::video_html(&page, video_id)?;
        let (resolution, video_link) =
            Self::video_links(html)
                .pop_last()
                .ok_or_else(|| LotcError::ScrapeError {
                    message: "no video renditions found".to_string(),
                })?;
        debug!("Best rendition: {}p", resolution);

        Ok((video_link, Self::audio_link(html)?))
    }

    async fn save_linked_file(&self, url: &str, dir: &Path) -> LotcResult<PathBuf> {
        let path = dir.join(Self::filename_from_url(url)?);
        let bytes = self.client.get(url).send().await?.error_for_status()?.bytes().await?;
        tokio::fs::write(&path, &bytes).await?;
        debug!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

#[async_trait]
impl DownloadPort for FacebookScraperAdapter {
    async fn download(&self, url: &str) -> Result<DownloadedVideo, DomainError> {
        let video_id = Self::video_id(url).map_err(LotcError::into_download_error)?;
        info!("Scraping Facebook video {}", video_id);

        let (video_link, audio_link) = self
            .video_and_audio_links(url, &video_id)
            .await
            .map_err(LotcError::into_download_error)?;

        let temp_dir = tempfile::tempdir_in(&self.work_dir)
            .map_err(|e| DomainError::FsFail(format!("Failed to create temp directory: {}", e)))?;
        let video_file = self
            .save_linked_file(&video_link, temp_dir.path())
            .await
            .map_err(LotcError::into_download_error)?;
        let audio_file = self
            .save_linked_file(&audio_link, temp_dir.path())
            .await
            .map_err(LotcError::into_download_error)?;

        let filename = format!("{}{}", video_id, OUTPUT_FILE_EXTENSION);
        let output = self.work_dir.join(&filename);
        self.editor
            .mux(
                &video_file.to_string_lossy(),
                &audio_file.to_string_lossy(),
                &output.to_string_lossy(),
            )
            .await?;

        Ok(DownloadedVideo {
            filename,
            used_fallback: true,
        })
    }
}
