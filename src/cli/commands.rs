//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use crate::app::AppContainer;
use crate::cli::args::{DownloadArgs, MergeArgs, TrimArgs};
use crate::cli::Commands;
use crate::domain::model::{CommandOutcome, DownloadRequest, MergeRequest, TrimRequest};

/// Run the parsed subcommand through the container's interactors
pub async fn execute(container: &dyn AppContainer, command: Commands) -> Result<CommandOutcome> {
    match command {
        Commands::Download(args) => download(container, args).await,
        Commands::Trim(args) => trim(container, args).await,
        Commands::Merge(args) => merge(container, args).await,
    }
}

/// Execute the download command
pub async fn download(container: &dyn AppContainer, args: DownloadArgs) -> Result<CommandOutcome> {
    info!(url = %args.url, ranges = args.timestamps.len(), "Starting download");
    let url = args.url.clone();
    let request = DownloadRequest {
        url: args.url,
        timestamps: args.timestamps,
        output: args.output,
    };

    container
        .download_interactor()
        .execute(request)
        .await
        .with_context(|| format!("Failed to download {}", url))
}

/// Execute the trim command
pub async fn trim(container: &dyn AppContainer, args: TrimArgs) -> Result<CommandOutcome> {
    info!(file = %args.file, ranges = args.timestamps.len(), "Starting trim");
    let file = args.file.clone();
    let request = TrimRequest {
        input: args.file,
        timestamps: args.timestamps,
        output: args.output,
    };

    container
        .trim_interactor()
        .execute(request)
        .await
        .with_context(|| format!("Failed to trim {}", file))
}

/// Execute the merge command
pub async fn merge(container: &dyn AppContainer, args: MergeArgs) -> Result<CommandOutcome> {
    info!(clips = args.clips.len(), "Starting merge");
    let request = MergeRequest {
        clips: args.clips,
        output: args.output,
    };

    container
        .merge_interactor()
        .execute(request)
        .await
        .context("Failed to merge clips")
}
