//! Command-line argument definitions

use clap::Args;

/// Arguments for the download command
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// URL of the video
    pub url: String,

    /// Ranges to keep (START-END), joined in the order given
    pub timestamps: Vec<String>,

    /// Output file path (must end in .mp4)
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the trim command
#[derive(Args, Debug)]
pub struct TrimArgs {
    /// Input video file path
    pub file: String,

    /// Ranges to keep (START-END), joined in the order given
    pub timestamps: Vec<String>,

    /// Output file path (default: "<file> - trimmed.mp4")
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the merge command
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Video files to join, in order
    #[arg(required = true)]
    pub clips: Vec<String>,

    /// Output file path (default: clip names joined with " - ")
    #[arg(short, long)]
    pub output: Option<String>,
}
