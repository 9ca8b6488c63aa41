//! FFprobe integration for network stream inspection.
//!
//! Runs `ffprobe -show_streams` against a stream URL under a hard timeout and
//! reduces the JSON output to the first video and first audio stream.

use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::external::StreamProbeResult;
use crate::util::run_with_timeout;

use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

/// Top level of `ffprobe -print_format json -show_streams`.
#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

/// The subset of per-stream fields the pipeline reads.
#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<i64>,
    height: Option<i64>,
    r_frame_rate: Option<String>,
    channels: Option<i64>,
    sample_rate: Option<String>,
}

/// Probes a stream URL with ffprobe.
///
/// Output from a run that exited non-zero is still used when it parses; only
/// a failed run with no output counts as a probe failure.
pub fn probe_stream(
    ffprobe_bin: &Path,
    url: &str,
    timeout: Duration,
) -> CoreResult<StreamProbeResult> {
    log::debug!("Running ffprobe for stream info on: {url}");

    let mut cmd = Command::new(ffprobe_bin);
    cmd.args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(url);

    let output = run_with_timeout(&mut cmd, "ffprobe", timeout)?;

    if output.stdout.iter().all(u8::is_ascii_whitespace) {
        if output.status.success() {
            return Err(CoreError::ProbeParse(format!("ffprobe produced no output for {url}")));
        }
        return Err(command_failed_error("ffprobe", output.status, output.stderr_text()));
    }

    if !output.status.success() {
        log::warn!(
            "ffprobe exited with {} for {url}; using partial output",
            output.status
        );
    }

    parse_probe_output(&output.stdout)
}

/// Reduces ffprobe JSON output to a [`StreamProbeResult`].
pub fn parse_probe_output(json: &[u8]) -> CoreResult<StreamProbeResult> {
    let parsed: ProbeOutput = serde_json::from_slice(json)
        .map_err(|e| CoreError::JsonParseError(format!("ffprobe stream output: {e}")))?;

    let mut result = StreamProbeResult::default();

    if let Some(video) = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
    {
        result.video_codec = video.codec_name.clone().filter(|c| !c.is_empty());
        result.width = video.width.and_then(non_negative);
        result.height = video.height.and_then(non_negative);
        result.fps = video.r_frame_rate.as_deref().and_then(frame_rate_numerator);
    }

    if let Some(audio) = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"))
    {
        result.audio_codec = audio.codec_name.clone().filter(|c| !c.is_empty());
        result.audio_channels = audio.channels.and_then(non_negative);
        result.audio_sample_rate_hz = audio
            .sample_rate
            .as_deref()
            .and_then(|r| r.trim().parse::<u32>().ok());
    }

    Ok(result)
}

fn non_negative(value: i64) -> Option<u32> {
    u32::try_from(value).ok()
}

/// Integer numerator of a `num/den` frame-rate ratio.
fn frame_rate_numerator(ratio: &str) -> Option<u32> {
    let numerator = ratio.split('/').next()?.trim();
    numerator
        .parse::<u32>()
        .ok()
        .or_else(|| numerator.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HD_STREAM: &str = r#"{
        "streams": [
            {"index": 0, "codec_name": "h264", "codec_type": "video",
             "width": 1920, "height": 1080, "r_frame_rate": "25/1"},
            {"index": 1, "codec_name": "aac", "codec_type": "audio",
             "sample_rate": "48000", "channels": 2},
            {"index": 2, "codec_name": "hevc", "codec_type": "video",
             "width": 3840, "height": 2160, "r_frame_rate": "50/1"}
        ]
    }"#;

    #[test]
    fn test_first_video_and_audio_stream() {
        let result = parse_probe_output(HD_STREAM.as_bytes()).unwrap();
        assert_eq!(result.video_codec.as_deref(), Some("h264"));
        assert_eq!(result.width, Some(1920));
        assert_eq!(result.height, Some(1080));
        assert_eq!(result.fps, Some(25));
        assert_eq!(result.audio_codec.as_deref(), Some("aac"));
        assert_eq!(result.audio_channels, Some(2));
        assert_eq!(result.audio_sample_rate_hz, Some(48000));
    }

    #[test]
    fn test_audio_only_stream() {
        let json = r#"{"streams": [{"codec_name": "mp3", "codec_type": "audio", "sample_rate": "44100", "channels": 1}]}"#;
        let result = parse_probe_output(json.as_bytes()).unwrap();
        assert!(result.video_track().is_none());
        assert_eq!(result.audio_channels, Some(1));
    }

    #[test]
    fn test_empty_and_invalid_output() {
        let result = parse_probe_output(b"{}").unwrap();
        assert_eq!(result, StreamProbeResult::default());
        assert!(matches!(
            parse_probe_output(b"not json"),
            Err(CoreError::JsonParseError(_))
        ));
    }

    #[test]
    fn test_frame_rate_numerator() {
        assert_eq!(frame_rate_numerator("25/1"), Some(25));
        assert_eq!(frame_rate_numerator("30000/1001"), Some(30000));
        assert_eq!(frame_rate_numerator("0/0"), Some(0));
        assert_eq!(frame_rate_numerator("29.97"), Some(29));
        assert_eq!(frame_rate_numerator("n/a"), None);
    }

    #[test]
    fn test_negative_dimensions_are_absent() {
        let json = r#"{"streams": [{"codec_name": "h264", "codec_type": "video", "width": -1, "height": 720, "r_frame_rate": "25/1"}]}"#;
        let result = parse_probe_output(json.as_bytes()).unwrap();
        assert_eq!(result.width, None);
        assert!(result.video_track().is_none());
    }
}
