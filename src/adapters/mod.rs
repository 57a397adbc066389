// Adapters - External system implementations

pub mod console_report;
pub mod exec_ffmpeg;
pub mod exec_ytdlp;
pub mod fb_scraper;
pub mod fs_std;
pub mod toml_config;

// Re-export adapters
pub use console_report::ConsoleReportAdapter;
pub use exec_ffmpeg::{FfmpegEditAdapter, FfmpegSettings};
pub use exec_ytdlp::YtDlpAdapter;
pub use fb_scraper::FacebookScraperAdapter;
pub use fs_std::FsStdAdapter;
pub use toml_config::TomlConfigAdapter;
