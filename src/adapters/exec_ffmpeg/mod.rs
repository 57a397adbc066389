//! FFmpeg execution adapter
//!
//! Loads clips with `ffprobe` and renders cuts, concatenations and muxes
//! with `ffmpeg`. Every render goes to a temporary file next to the output
//! and is renamed into place once ffmpeg succeeds, so an output may safely
//! share its name with one of the inputs.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::error::{LotcError, LotcResult};
use crate::ports::*;

/// Mode of newly rendered files
#[cfg(unix)]
const OUTPUT_FILE_MODE: u32 = 0o644;

/// Sample rate every audio track is resampled to before concatenation
const AUDIO_SAMPLE_RATE: u32 = 44_100;

/// Programs and codecs used for rendering
#[derive(Debug, Clone)]
pub struct FfmpegSettings {
    pub ffmpeg: String,
    pub ffprobe: String,
    pub video_codec: String,
    pub audio_codec: String,
}

impl Default for FfmpegSettings {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
        }
    }
}

/// FFmpeg-based editor adapter
pub struct FfmpegEditAdapter {
    settings: FfmpegSettings,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

impl FfmpegEditAdapter {
    /// Create new FFmpeg adapter
    pub fn new(settings: FfmpegSettings) -> Self {
        Self { settings }
    }

    /// Interpret `ffprobe -print_format json` output
    fn parse_probe_output(json: &[u8]) -> LotcResult<MediaProperties> {
        let probe: ProbeOutput = serde_json::from_slice(json)?;

        let video = probe
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| LotcError::ProbeError {
                message: "no video stream found".to_string(),
            })?;

        let (width, height) = match (video.width, video.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(LotcError::ProbeError {
                    message: "video stream has no frame size".to_string(),
                })
            }
        };

        let has_audio = probe
            .streams
            .iter()
            .any(|s| s.codec_type.as_deref() == Some("audio"));

        let duration = probe
            .format
            .and_then(|f| f.duration)
            .and_then(|d| d.parse::<f64>().ok());

        Ok(MediaProperties {
            duration,
            width,
            height,
            has_audio,
        })
    }

    /// Length of a clip in seconds, needed only to generate matching silence.
    /// A range running past the end of the source stops where ffmpeg stops.
    fn clip_duration(clip: &Clip) -> Result<f64, DomainError> {
        match &clip.range {
            Some(range) => {
                let end = match clip.properties.duration {
                    Some(duration) => range.end.as_seconds().min(duration),
                    None => range.end.as_seconds(),
                };
                Ok((end - range.start.as_seconds()).max(0.0))
            }
            None => clip.properties.duration.ok_or_else(|| {
                DomainError::EditFailed(format!(
                    "duration of \"{}\" is unknown, cannot pad its missing audio",
                    clip.source
                ))
            }),
        }
    }

    /// Build the ffmpeg arguments that concatenate `clips` into `output`.
    ///
    /// Every clip is scaled and padded to the first clip's frame size. When
    /// any clip carries audio, clips without audio contribute silence of
    /// their own length so the audio track stays aligned.
    pub fn concat_args(&self, clips: &[Clip], output: &str) -> Result<Vec<String>, DomainError> {
        let first = clips
            .first()
            .ok_or_else(|| DomainError::BadArgs("No clips to write".to_string()))?;
        // libx264 rejects odd frame sizes
        let width = first.properties.width & !1;
        let height = first.properties.height & !1;
        let with_audio = clips.iter().any(|c| c.properties.has_audio);

        let mut args = Self::base_args();
        for clip in clips {
            if let Some(range) = &clip.range {
                args.extend(["-ss".to_string(), range.start.to_string()]);
                args.extend(["-to".to_string(), range.end.to_string()]);
            }
            args.extend(["-i".to_string(), clip.source.clone()]);
        }

        let mut filters = Vec::with_capacity(clips.len() * 2 + 1);
        let mut concat_inputs = String::new();
        for (i, clip) in clips.iter().enumerate() {
            filters.push(format!(
                "[{i}:v:0]scale={w}:{h}:force_original_aspect_ratio=decrease,\
                 pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1,format=yuv420p[v{i}]",
                i = i,
                w = width,
                h = height
            ));
            concat_inputs.push_str(&format!("[v{}]", i));

            if with_audio {
                if clip.properties.has_audio {
                    filters.push(format!(
                        "[{i}:a:0]aresample={rate},aformat=channel_layouts=stereo[a{i}]",
                        i = i,
                        rate = AUDIO_SAMPLE_RATE
                    ));
                } else {
                    filters.push(format!(
                        "anullsrc=channel_layout=stereo:sample_rate={rate},atrim=duration={dur}[a{i}]",
                        i = i,
                        rate = AUDIO_SAMPLE_RATE,
                        dur = Self::clip_duration(clip)?
                    ));
                }
                concat_inputs.push_str(&format!("[a{}]", i));
            }
        }

        let audio_streams = if with_audio { 1 } else { 0 };
        let mut concat = format!(
            "{}concat=n={}:v=1:a={}[outv]",
            concat_inputs,
            clips.len(),
            audio_streams
        );
        if with_audio {
            concat.push_str("[outa]");
        }
        filters.push(concat);

        args.extend(["-filter_complex".to_string(), filters.join(";")]);
        args.extend(["-map".to_string(), "[outv]".to_string()]);
        if with_audio {
            args.extend(["-map".to_string(), "[outa]".to_string()]);
            args.extend(["-c:a".to_string(), self.settings.audio_codec.clone()]);
        }
        args.extend(["-c:v".to_string(), self.settings.video_codec.clone()]);
        args.extend(["-movflags".to_string(), "+faststart".to_string()]);
        args.push(output.to_string());

        Ok(args)
    }

    /// Build the ffmpeg arguments that combine a video and an audio file
    pub fn mux_args(&self, video: &str, audio: &str, output: &str) -> Vec<String> {
        let mut args = Self::base_args();
        args.extend(
            [
                "-i",
                video,
                "-i",
                audio,
                "-map",
                "0:v:0",
                "-map",
                "1:a:0",
                "-c:v",
                self.settings.video_codec.as_str(),
                "-c:a",
                self.settings.audio_codec.as_str(),
                output,
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        args
    }

    fn base_args() -> Vec<String> {
        ["-y", "-hide_banner", "-loglevel", "error"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Run ffmpeg, writing to a temporary sibling of `output` that is
    /// renamed over `output` on success
    async fn render<F>(&self, output: &str, build_args: F) -> Result<(), DomainError>
    where
        F: FnOnce(&str) -> Result<Vec<String>, DomainError>,
    {
        let parent = match Path::new(output).parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => std::path::PathBuf::from("."),
        };
        let temp_path = tempfile::Builder::new()
            .prefix(".lotc-")
            .suffix(OUTPUT_FILE_EXTENSION)
            .tempfile_in(&parent)
            .map_err(|e| DomainError::FsFail(format!("Failed to create temp file: {}", e)))?
            .into_temp_path();
        let temp_str = temp_path.to_string_lossy().to_string();

        let args = build_args(&temp_str)?;
        self.run(&self.settings.ffmpeg, &args)
            .await
            .map_err(LotcError::into_edit_error)?;

        Self::set_output_permissions(&temp_path, output)?;
        temp_path
            .persist(output)
            .map_err(|e| DomainError::FsFail(format!("Failed to move render into {}: {}", output, e)))?;
        info!("Wrote {}", output);
        Ok(())
    }

    /// Temp files are created owner-only; give the render the permissions
    /// of the file it replaces, or 0644 for a new file
    #[cfg(unix)]
    fn set_output_permissions(temp_path: &Path, output: &str) -> Result<(), DomainError> {
        use std::os::unix::fs::PermissionsExt;

        let permissions = match std::fs::metadata(output) {
            Ok(existing) => existing.permissions(),
            Err(_) => std::fs::Permissions::from_mode(OUTPUT_FILE_MODE),
        };
        std::fs::set_permissions(temp_path, permissions)
            .map_err(|e| DomainError::FsFail(format!("Failed to set permissions on {}: {}", output, e)))
    }

    #[cfg(not(unix))]
    fn set_output_permissions(_temp_path: &Path, _output: &str) -> Result<(), DomainError> {
        Ok(())
    }

    async fn run(&self, program: &str, args: &[String]) -> LotcResult<Vec<u8>> {
        debug!("Running {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|source| LotcError::SpawnError {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(LotcError::ProcessFailed {
                program: program.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl EditPort for FfmpegEditAdapter {
    async fn load(&self, file_path: &str) -> Result<Clip, DomainError> {
        if !Path::new(file_path).exists() {
            return Err(DomainError::FileNotFound(file_path.to_string()));
        }

        let args: Vec<String> = [
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
            file_path,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let stdout = self
            .run(&self.settings.ffprobe, &args)
            .await
            .map_err(LotcError::into_edit_error)?;
        let properties = Self::parse_probe_output(&stdout).map_err(LotcError::into_edit_error)?;

        debug!("Loaded {}: {:?}", file_path, properties);
        Ok(Clip::new(file_path, properties))
    }

    async fn write(&self, clip: &Clip, output: &str) -> Result<(), DomainError> {
        self.concatenate_and_write(std::slice::from_ref(clip), output)
            .await
    }

    async fn concatenate_and_write(&self, clips: &[Clip], output: &str) -> Result<(), DomainError> {
        info!("Rendering {} clip(s) into {}", clips.len(), output);
        self.render(output, |target| self.concat_args(clips, target))
            .await
    }

    async fn mux(&self, video: &str, audio: &str, output: &str) -> Result<(), DomainError> {
        info!("Muxing {} and {} into {}", video, audio, output);
        self.render(output, |target| Ok(self.mux_args(video, audio, target)))
            .await
    }
}
