//! lotc Library
//!
//! Downloads videos with yt-dlp, cuts `START-END` ranges out of them and
//! joins clips with ffmpeg. The domain rules and interactors are independent
//! of the external programs, which sit behind the traits in [`ports`].

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{CommandOutcome, Timestamp, TimestampRange};
pub use error::{LotcError, LotcResult};
