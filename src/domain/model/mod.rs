// Domain models - Core types and data structures

use std::fmt;

use crate::domain::errors::DomainError;

/// Container format every output file is written in
pub const OUTPUT_FILE_FORMAT: &str = "mp4";

/// Extension (with leading dot) every output file must carry
pub const OUTPUT_FILE_EXTENSION: &str = ".mp4";

/// Descriptor appended to derived output names when trimming
pub const DEFAULT_DESCRIPTOR: &str = "trimmed";

/// A single point in a video, kept in the form the user typed it.
///
/// Accepted forms are `S`, `M:S` and `H:M:S`, each with an optional
/// fractional part on the seconds (`1:40.8`). The text is handed to the
/// editor unchanged; the parsed seconds are only used for ordering checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamp {
    text: String,
    seconds: f64,
}

impl Timestamp {
    /// Parse a timestamp such as `90`, `1:30`, `0:01:30.5`
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidTimestamp(
                "Timestamp cannot be empty".to_string(),
            ));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() > 3 {
            return Err(DomainError::InvalidTimestamp(format!(
                "'{}' has too many fields. Supported formats: SS.ms, MM:SS.ms, HH:MM:SS.ms",
                trimmed
            )));
        }

        let (units, last) = parts.split_at(parts.len() - 1);
        let seconds_part = Self::parse_seconds_field(last[0], trimmed)?;
        let units = units
            .iter()
            .map(|unit| Self::parse_whole_field(unit, trimmed))
            .collect::<Result<Vec<u32>, DomainError>>()?;

        let seconds = match units.as_slice() {
            [] => seconds_part,
            [minutes] => {
                Self::check_below_sixty(seconds_part, "Seconds", trimmed)?;
                *minutes as f64 * 60.0 + seconds_part
            }
            [hours, minutes] => {
                Self::check_below_sixty(*minutes as f64, "Minutes", trimmed)?;
                Self::check_below_sixty(seconds_part, "Seconds", trimmed)?;
                *hours as f64 * 3600.0 + *minutes as f64 * 60.0 + seconds_part
            }
            _ => unreachable!("at most three fields"),
        };

        Ok(Self {
            text: trimmed.to_string(),
            seconds,
        })
    }

    fn parse_whole_field(field: &str, original: &str) -> Result<u32, DomainError> {
        if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidTimestamp(format!(
                "'{}' is not a valid time",
                original
            )));
        }
        field
            .parse::<u32>()
            .map_err(|_| DomainError::InvalidTimestamp(format!("'{}' is out of range", original)))
    }

    fn parse_seconds_field(field: &str, original: &str) -> Result<f64, DomainError> {
        let well_formed = !field.is_empty()
            && field.chars().all(|c| c.is_ascii_digit() || c == '.')
            && field.matches('.').count() <= 1
            && field.chars().any(|c| c.is_ascii_digit());
        if !well_formed {
            return Err(DomainError::InvalidTimestamp(format!(
                "'{}' is not a valid time",
                original
            )));
        }
        field
            .parse::<f64>()
            .map_err(|_| DomainError::InvalidTimestamp(format!("'{}' is not a valid time", original)))
    }

    fn check_below_sixty(value: f64, unit: &str, original: &str) -> Result<(), DomainError> {
        if value >= 60.0 {
            return Err(DomainError::InvalidTimestamp(format!(
                "{} must be less than 60 in '{}'",
                unit, original
            )));
        }
        Ok(())
    }

    /// The timestamp exactly as given (trimmed)
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A `START-END` pair selecting part of a video
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimestampRange {
    /// Create a range, rejecting empty or reversed ones
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, DomainError> {
        if start.as_seconds() >= end.as_seconds() {
            return Err(DomainError::InvalidTimestamp(format!(
                "start ({}) must be before end ({})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse `START-END`; whitespace around either side is ignored
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let mut sides = text.split('-');
        match (sides.next(), sides.next(), sides.next()) {
            (Some(start), Some(end), None) => {
                Self::new(Timestamp::parse(start)?, Timestamp::parse(end)?)
            }
            _ => Err(DomainError::InvalidTimestamp(format!(
                "'{}' must be in START-END format (e.g. 0:30-0:45)",
                text
            ))),
        }
    }

    /// Parse every range, stopping at the first malformed one
    pub fn parse_all<S: AsRef<str>>(texts: &[S]) -> Result<Vec<Self>, DomainError> {
        texts.iter().map(|text| Self::parse(text.as_ref())).collect()
    }
}

impl fmt::Display for TimestampRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Properties discovered when a video is loaded
#[derive(Debug, Clone, PartialEq)]
pub struct MediaProperties {
    pub duration: Option<f64>,
    pub width: u32,
    pub height: u32,
    pub has_audio: bool,
}

/// A loaded video, or a sub-range of one.
///
/// Ranges always refer to the source file's own timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub source: String,
    pub range: Option<TimestampRange>,
    pub properties: MediaProperties,
}

impl Clip {
    pub fn new(source: impl Into<String>, properties: MediaProperties) -> Self {
        Self {
            source: source.into(),
            range: None,
            properties,
        }
    }

    /// Restrict this clip's source to the given range
    pub fn subclip(&self, range: TimestampRange) -> Self {
        Self {
            source: self.source.clone(),
            range: Some(range),
            properties: self.properties.clone(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.range.is_none()
    }
}

/// Request for the download command
#[derive(Debug, Clone, Default)]
pub struct DownloadRequest {
    pub url: String,
    pub timestamps: Vec<String>,
    pub output: Option<String>,
}

/// Request for the trim command
#[derive(Debug, Clone, Default)]
pub struct TrimRequest {
    pub input: String,
    pub timestamps: Vec<String>,
    pub output: Option<String>,
}

/// Request for the merge command
#[derive(Debug, Clone, Default)]
pub struct MergeRequest {
    pub clips: Vec<String>,
    pub output: Option<String>,
}

/// Result of downloading a URL
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedVideo {
    pub filename: String,
    pub used_fallback: bool,
}

/// What a command did with its input
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// A new file was written
    Saved { output_file: String },
    /// Nothing was written; the input was left as it was
    Untouched { input: String },
}

impl CommandOutcome {
    pub fn output_file(&self) -> Option<&str> {
        match self {
            CommandOutcome::Saved { output_file } => Some(output_file),
            CommandOutcome::Untouched { .. } => None,
        }
    }
}
