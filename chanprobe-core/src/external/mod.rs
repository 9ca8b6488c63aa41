// ============================================================================
// chanprobe-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Stream Inspection Through ffprobe and ffmpeg
//
// This module hides the media tools behind the Prober trait. The pipeline only
// ever talks to a Prober, so the orchestration logic can be exercised with the
// scripted MockProber while production runs use FfmpegProber.
//
// KEY COMPONENTS:
// - Prober: the two operations the pipeline needs (probe, capture_frame)
// - StreamProbeResult: first video/audio track data returned by a probe
// - FfmpegProber: Prober backed by the ffprobe and ffmpeg binaries
// - check_dependency: startup check for a required binary

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult, command_start_error};

// ---- Standard library imports ----
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

// ============================================================================
// SUBMODULES
// ============================================================================

/// Frame capture through ffmpeg
pub mod ffmpeg_executor;

/// Stream probing through ffprobe
pub mod ffprobe_executor;

/// Scripted Prober for tests
pub mod mocks;

pub use ffmpeg_executor::capture_frame;
pub use ffprobe_executor::{parse_probe_output, probe_stream};

// ============================================================================
// PROBE DATA
// ============================================================================

/// Track data reported by a probe. Only the first video and first audio
/// stream are kept; a missing video field means no usable video track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamProbeResult {
    pub video_codec: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Numerator of the reported frame-rate ratio
    pub fps: Option<u32>,
    pub audio_codec: Option<String>,
    pub audio_channels: Option<u32>,
    pub audio_sample_rate_hz: Option<u32>,
}

/// A fully described video track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTrack {
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl StreamProbeResult {
    /// The video track, present only when codec, size and frame rate are all known.
    pub fn video_track(&self) -> Option<VideoTrack> {
        Some(VideoTrack {
            codec: self.video_codec.clone()?,
            width: self.width?,
            height: self.height?,
            fps: self.fps?,
        })
    }
}

// ============================================================================
// PROBER ABSTRACTION
// ============================================================================

/// Network stream inspection used by the channel pipeline.
///
/// Implementations must never let the spawned tools read the caller's stdin,
/// and must treat an expired timeout as a failure.
pub trait Prober: Send + Sync {
    /// Probes the stream at `url` for its track metadata.
    fn probe(&self, url: &str, timeout: Duration) -> CoreResult<StreamProbeResult>;

    /// Captures one frame, `seek` into the stream, to `output`.
    ///
    /// Returns the path of the written image.
    fn capture_frame(
        &self,
        url: &str,
        timeout: Duration,
        seek: Duration,
        output: &Path,
    ) -> CoreResult<PathBuf>;
}

/// Prober backed by the `ffprobe` and `ffmpeg` binaries.
#[derive(Debug, Clone)]
pub struct FfmpegProber {
    ffprobe_bin: PathBuf,
}

impl Default for FfmpegProber {
    fn default() -> Self {
        Self {
            ffprobe_bin: PathBuf::from("ffprobe"),
        }
    }
}

impl FfmpegProber {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prober for FfmpegProber {
    fn probe(&self, url: &str, timeout: Duration) -> CoreResult<StreamProbeResult> {
        probe_stream(&self.ffprobe_bin, url, timeout)
    }

    fn capture_frame(
        &self,
        url: &str,
        timeout: Duration,
        seek: Duration,
        output: &Path,
    ) -> CoreResult<PathBuf> {
        capture_frame(url, timeout, seek, output)
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that a required external command can be executed.
///
/// Runs `<cmd_name> -version` and only cares whether the process starts.
///
/// # Errors
///
/// * `CoreError::DependencyNotFound` if the command is not on PATH
/// * `CoreError::CommandStart` if it exists but cannot be started
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::error!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{cmd_name}': {e}");
            Err(command_start_error(cmd_name, e))
        }
    }
}

/// Checks every tool the production prober needs.
pub fn check_required_tools() -> CoreResult<()> {
    for tool in ["ffprobe", "ffmpeg"] {
        check_dependency(tool)?;
    }
    Ok(())
}
