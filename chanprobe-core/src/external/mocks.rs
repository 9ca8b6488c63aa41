// chanprobe-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

use super::{Prober, StreamProbeResult};
use crate::error::{CoreError, CoreResult, command_timeout_error};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted outcome of a probe.
#[derive(Debug, Clone)]
pub enum MockProbe {
    Success(StreamProbeResult),
    Failure(String),
    Timeout,
}

/// Scripted outcome of a frame capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCapture {
    /// Writes a small placeholder image and succeeds
    Success,
    /// Reports success without writing the file
    NoFile,
    Failure,
    Timeout,
}

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Probe { url: String, timeout: Duration },
    Capture { url: String, timeout: Duration, seek: Duration },
}

/// Prober returning scripted results per URL and recording every call.
///
/// Unscripted URLs fail both operations.
#[derive(Debug, Default)]
pub struct MockProber {
    probes: Mutex<HashMap<String, MockProbe>>,
    captures: Mutex<HashMap<String, MockCapture>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_probe(&self, url: &str, outcome: MockProbe) {
        self.probes
            .lock()
            .expect("mock lock poisoned")
            .insert(url.to_string(), outcome);
    }

    pub fn expect_capture(&self, url: &str, outcome: MockCapture) {
        self.captures
            .lock()
            .expect("mock lock poisoned")
            .insert(url.to_string(), outcome);
    }

    /// Scripts a stream with a complete video track and a stereo AAC track,
    /// whose screenshot succeeds.
    pub fn expect_healthy_stream(&self, url: &str, width: u32, height: u32) {
        self.expect_probe(url, MockProbe::Success(video_stream(width, height)));
        self.expect_capture(url, MockCapture::Success);
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().expect("mock lock poisoned").clone()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().expect("mock lock poisoned").push(call);
    }
}

/// A probe result with an h264 video track and a 48 kHz stereo AAC track.
pub fn video_stream(width: u32, height: u32) -> StreamProbeResult {
    StreamProbeResult {
        video_codec: Some("h264".to_string()),
        width: Some(width),
        height: Some(height),
        fps: Some(25),
        audio_codec: Some("aac".to_string()),
        audio_channels: Some(2),
        audio_sample_rate_hz: Some(48000),
    }
}

impl Prober for MockProber {
    fn probe(&self, url: &str, timeout: Duration) -> CoreResult<StreamProbeResult> {
        self.record(MockCall::Probe {
            url: url.to_string(),
            timeout,
        });
        let scripted = self
            .probes
            .lock()
            .expect("mock lock poisoned")
            .get(url)
            .cloned();
        match scripted {
            Some(MockProbe::Success(result)) => Ok(result),
            Some(MockProbe::Failure(msg)) => Err(CoreError::ProbeParse(msg)),
            Some(MockProbe::Timeout) => Err(command_timeout_error("ffprobe", timeout.as_secs())),
            None => Err(CoreError::ProbeParse(format!("no scripted probe for {url}"))),
        }
    }

    fn capture_frame(
        &self,
        url: &str,
        timeout: Duration,
        seek: Duration,
        output: &Path,
    ) -> CoreResult<PathBuf> {
        self.record(MockCall::Capture {
            url: url.to_string(),
            timeout,
            seek,
        });
        let scripted = self
            .captures
            .lock()
            .expect("mock lock poisoned")
            .get(url)
            .copied();
        match scripted {
            Some(MockCapture::Success) => {
                if let Some(parent) = output.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(output, b"mock frame")?;
                Ok(output.to_path_buf())
            }
            Some(MockCapture::NoFile) => Ok(output.to_path_buf()),
            Some(MockCapture::Timeout) => Err(command_timeout_error("ffmpeg", timeout.as_secs())),
            Some(MockCapture::Failure) | None => {
                Err(CoreError::CaptureMissing(output.display().to_string()))
            }
        }
    }
}
