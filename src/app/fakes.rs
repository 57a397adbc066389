// In-memory port implementations for interactor tests

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Filesystem holding a set of file names
#[derive(Default)]
pub struct FakeFs {
    pub files: Mutex<HashSet<String>>,
    pub deleted: Mutex<Vec<String>>,
    pub moved: Mutex<Vec<(String, String)>>,
}

impl FakeFs {
    pub fn with_files(files: &[&str]) -> Arc<Self> {
        let fs = Self::default();
        fs.files
            .lock()
            .unwrap()
            .extend(files.iter().map(|f| f.to_string()));
        Arc::new(fs)
    }

    pub fn contains(&self, file: &str) -> bool {
        self.files.lock().unwrap().contains(file)
    }
}

#[async_trait]
impl FsPort for FakeFs {
    async fn file_exists(&self, file_path: &str) -> Result<bool, DomainError> {
        Ok(self.contains(file_path))
    }

    async fn get_file_size(&self, file_path: &str) -> Result<u64, DomainError> {
        if self.contains(file_path) {
            Ok(1024)
        } else {
            Err(DomainError::FsFail(format!("no such file: {}", file_path)))
        }
    }

    async fn delete_file(&self, file_path: &str) -> Result<(), DomainError> {
        if !self.files.lock().unwrap().remove(file_path) {
            return Err(DomainError::FsFail(format!("no such file: {}", file_path)));
        }
        self.deleted.lock().unwrap().push(file_path.to_string());
        Ok(())
    }

    async fn move_file(&self, from: &str, to: &str) -> Result<(), DomainError> {
        let mut files = self.files.lock().unwrap();
        if !files.remove(from) {
            return Err(DomainError::FsFail(format!("no such file: {}", from)));
        }
        files.insert(to.to_string());
        self.moved
            .lock()
            .unwrap()
            .push((from.to_string(), to.to_string()));
        Ok(())
    }
}

/// A render the fake editor was asked to perform
#[derive(Debug, Clone, PartialEq)]
pub struct Render {
    pub clips: Vec<Clip>,
    pub output: String,
}

/// Editor that records renders and adds their outputs to the fake filesystem
pub struct FakeEditor {
    pub fs: Arc<FakeFs>,
    pub loaded: Mutex<Vec<String>>,
    pub renders: Mutex<Vec<Render>>,
    pub muxes: Mutex<Vec<(String, String, String)>>,
}

impl FakeEditor {
    pub fn new(fs: Arc<FakeFs>) -> Arc<Self> {
        Arc::new(Self {
            fs,
            loaded: Mutex::new(Vec::new()),
            renders: Mutex::new(Vec::new()),
            muxes: Mutex::new(Vec::new()),
        })
    }

    pub fn renders(&self) -> Vec<Render> {
        self.renders.lock().unwrap().clone()
    }

    fn record(&self, clips: Vec<Clip>, output: &str) {
        self.renders.lock().unwrap().push(Render {
            clips,
            output: output.to_string(),
        });
        self.fs.files.lock().unwrap().insert(output.to_string());
    }
}

#[async_trait]
impl EditPort for FakeEditor {
    async fn load(&self, file_path: &str) -> Result<Clip, DomainError> {
        if !self.fs.contains(file_path) {
            return Err(DomainError::FileNotFound(file_path.to_string()));
        }
        self.loaded.lock().unwrap().push(file_path.to_string());
        Ok(Clip::new(
            file_path,
            MediaProperties {
                duration: Some(300.0),
                width: 1280,
                height: 720,
                has_audio: true,
            },
        ))
    }

    async fn write(&self, clip: &Clip, output: &str) -> Result<(), DomainError> {
        self.record(vec![clip.clone()], output);
        Ok(())
    }

    async fn concatenate_and_write(&self, clips: &[Clip], output: &str) -> Result<(), DomainError> {
        self.record(clips.to_vec(), output);
        Ok(())
    }

    async fn mux(&self, video: &str, audio: &str, output: &str) -> Result<(), DomainError> {
        self.muxes
            .lock()
            .unwrap()
            .push((video.to_string(), audio.to_string(), output.to_string()));
        self.fs.files.lock().unwrap().insert(output.to_string());
        Ok(())
    }
}

/// Downloader returning a fixed result and recording requested URLs
pub struct FakeDownloader {
    pub fs: Arc<FakeFs>,
    pub result: Result<String, DomainError>,
    pub used_fallback: bool,
    pub urls: Mutex<Vec<String>>,
}

impl FakeDownloader {
    pub fn producing(fs: Arc<FakeFs>, filename: &str) -> Arc<Self> {
        Arc::new(Self {
            fs,
            result: Ok(filename.to_string()),
            used_fallback: false,
            urls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(fs: Arc<FakeFs>, message: &str) -> Arc<Self> {
        Arc::new(Self {
            fs,
            result: Err(DomainError::DownloadFailed(message.to_string())),
            used_fallback: false,
            urls: Mutex::new(Vec::new()),
        })
    }

    pub fn as_fallback(fs: Arc<FakeFs>, filename: &str) -> Arc<Self> {
        Arc::new(Self {
            fs,
            result: Ok(filename.to_string()),
            used_fallback: true,
            urls: Mutex::new(Vec::new()),
        })
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadPort for FakeDownloader {
    async fn download(&self, url: &str) -> Result<DownloadedVideo, DomainError> {
        self.urls.lock().unwrap().push(url.to_string());
        let filename = self.result.clone()?;
        self.fs.files.lock().unwrap().insert(filename.clone());
        Ok(DownloadedVideo {
            filename,
            used_fallback: self.used_fallback,
        })
    }
}

/// Reporter keeping every line it was given
#[derive(Default)]
pub struct RecordingReport {
    pub lines: Mutex<Vec<String>>,
}

impl RecordingReport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportPort for RecordingReport {
    async fn step(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }

    async fn warning(&self, message: &str) {
        self.lines.lock().unwrap().push(format!("warning: {}", message));
    }

    async fn tree(&self, branches: &[String]) {
        let mut lines = self.lines.lock().unwrap();
        lines.extend(branches.iter().map(|b| format!("- {}", b)));
    }

    async fn saved(&self, output_file: &str) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("saved: {}", output_file));
    }
}
