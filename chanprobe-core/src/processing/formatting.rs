//! Track descriptions written to the report.

use crate::external::{StreamProbeResult, VideoTrack};

/// Describes a video track as `#1 <codec>, <w>x<h>,<fps>fps`.
#[must_use]
pub fn video_track_description(track: &VideoTrack) -> String {
    format!(
        "#1 {}, {}x{},{}fps",
        track.codec, track.width, track.height, track.fps
    )
}

/// Channel label for the audio description. Only mono and stereo are
/// labelled; an unreported count is taken as stereo.
fn channel_label(channels: Option<u32>) -> Option<&'static str> {
    match channels {
        Some(1) => Some("1ch"),
        Some(2) | None => Some("2ch"),
        Some(_) => None,
    }
}

/// Describes the first audio track as `#1 <codec>,<n>ch,<k>khz`.
///
/// Empty unless codec, channel label and sample rate are all available.
#[must_use]
pub fn audio_track_description(probe: &StreamProbeResult) -> String {
    match (
        probe.audio_codec.as_deref(),
        channel_label(probe.audio_channels),
        probe.audio_sample_rate_hz,
    ) {
        (Some(codec), Some(label), Some(rate)) => {
            format!("#1 {codec},{label},{}khz", rate / 1000)
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(codec: Option<&str>, channels: Option<u32>, rate: Option<u32>) -> StreamProbeResult {
        StreamProbeResult {
            audio_codec: codec.map(str::to_string),
            audio_channels: channels,
            audio_sample_rate_hz: rate,
            ..Default::default()
        }
    }

    #[test]
    fn test_video_description() {
        let track = VideoTrack {
            codec: "h264".to_string(),
            width: 1920,
            height: 1080,
            fps: 25,
        };
        assert_eq!(video_track_description(&track), "#1 h264, 1920x1080,25fps");
    }

    #[test]
    fn test_audio_description() {
        assert_eq!(
            audio_track_description(&audio(Some("aac"), Some(2), Some(48000))),
            "#1 aac,2ch,48khz"
        );
        assert_eq!(
            audio_track_description(&audio(Some("mp2"), Some(1), Some(44100))),
            "#1 mp2,1ch,44khz"
        );
    }

    #[test]
    fn test_audio_channel_count_defaults_to_stereo() {
        assert_eq!(
            audio_track_description(&audio(Some("aac"), None, Some(32000))),
            "#1 aac,2ch,32khz"
        );
    }

    #[test]
    fn test_audio_description_omitted() {
        assert_eq!(audio_track_description(&audio(Some("ac3"), Some(6), Some(48000))), "");
        assert_eq!(audio_track_description(&audio(Some("aac"), Some(2), None)), "");
        assert_eq!(audio_track_description(&audio(None, Some(2), Some(48000))), "");
    }
}
