// ============================================================================
// chanprobe-core/src/processing/channel.rs
// ============================================================================
//
// CHANNEL PROCESSOR: Per-Channel Validation State Machine
//
// Drives one playlist entry through
//
//   Start -> Probing -> {VideoFound | NoVideo} -> ScreenshotAttempt -> Reconcile -> Done
//
// and produces exactly one ChannelResult. Prober failures are recorded as
// data on the result (tier Error, not connected); nothing raised by the
// Prober escapes process().

use crate::external::{Prober, StreamProbeResult, VideoTrack};
use crate::playlist::ChannelEntry;
use crate::processing::formatting::{audio_track_description, video_track_description};
use crate::reconcile::{Mismatch, detect_mismatch, rewrite_name};
use crate::tier::{ResolutionTier, classify};
use crate::util::screenshot_filename;

use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Time bounds applied to a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub probe: Duration,
    pub screenshot: Duration,
    pub seek: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            probe: Duration::from_secs(crate::config::DEFAULT_PROBE_TIMEOUT_SECS),
            screenshot: Duration::from_secs(crate::config::DEFAULT_SCREENSHOT_TIMEOUT_SECS),
            seek: Duration::from_secs(crate::config::DEFAULT_SEEK_SECS),
        }
    }
}

/// Final record for one channel. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelResult {
    pub entry: ChannelEntry,
    pub video_track_description: String,
    pub audio_track_description: String,
    /// File name inside the screenshot directory; empty when no screenshot was taken
    pub screenshot_filename: String,
    pub connected: bool,
    pub tier: ResolutionTier,
    pub rewritten_name: String,
    /// Declared/measured tier disagreement found during reconciliation
    pub mismatch: Option<Mismatch>,
}

/// States of the per-channel pipeline.
#[derive(Debug)]
enum ChannelState {
    Start,
    Probing,
    VideoFound(VideoTrack),
    NoVideo,
    ScreenshotAttempt(ResolutionTier),
    Reconcile {
        tier: ResolutionTier,
        connected: bool,
        screenshot: Option<String>,
    },
    Done(ChannelResult),
}

/// Runs single channels through probe, classification, capture and reconciliation.
pub struct ChannelProcessor<'a, P: Prober + ?Sized> {
    prober: &'a P,
    timeouts: Timeouts,
    screenshot_dir: PathBuf,
}

impl<'a, P: Prober + ?Sized> ChannelProcessor<'a, P> {
    pub fn new(prober: &'a P, timeouts: Timeouts, screenshot_dir: &Path) -> Self {
        Self {
            prober,
            timeouts,
            screenshot_dir: screenshot_dir.to_path_buf(),
        }
    }

    /// Validates one channel.
    pub fn process(&self, entry: &ChannelEntry) -> ChannelResult {
        let mut video_description = String::new();
        let mut audio_description = String::new();
        let mut state = ChannelState::Start;

        loop {
            state = match state {
                ChannelState::Start => {
                    info!("[{}] {} -> {}", entry.ordinal, entry.declared_name, entry.url);
                    ChannelState::Probing
                }

                ChannelState::Probing => match self.prober.probe(&entry.url, self.timeouts.probe) {
                    Ok(probe) => {
                        audio_description = audio_track_description(&probe);
                        self.after_probe(entry, &probe, &mut video_description)
                    }
                    Err(e) => {
                        warn!("[{}] Probe failed: {e}", entry.ordinal);
                        ChannelState::Reconcile {
                            tier: ResolutionTier::Error,
                            connected: false,
                            screenshot: None,
                        }
                    }
                },

                ChannelState::VideoFound(track) => {
                    let tier = classify(track.width, track.height);
                    debug!(
                        "[{}] {}x{} classified as {tier}",
                        entry.ordinal, track.width, track.height
                    );
                    ChannelState::ScreenshotAttempt(tier)
                }

                ChannelState::NoVideo => {
                    warn!("[{}] No usable video track", entry.ordinal);
                    ChannelState::Reconcile {
                        tier: ResolutionTier::Error,
                        connected: false,
                        screenshot: None,
                    }
                }

                ChannelState::ScreenshotAttempt(tier) => self.capture(entry, tier),

                ChannelState::Reconcile {
                    tier,
                    connected,
                    screenshot,
                } => {
                    let mismatch = detect_mismatch(entry, tier);
                    if let Some(m) = &mismatch {
                        warn!("[{}] Resolution mismatch: {m}", entry.ordinal);
                    }
                    let rewritten_name = rewrite_name(&entry.declared_name, tier);
                    ChannelState::Done(ChannelResult {
                        entry: entry.clone(),
                        video_track_description: std::mem::take(&mut video_description),
                        audio_track_description: std::mem::take(&mut audio_description),
                        screenshot_filename: screenshot.unwrap_or_default(),
                        connected,
                        tier,
                        rewritten_name,
                        mismatch,
                    })
                }

                ChannelState::Done(result) => {
                    info!(
                        "[{}] connected={} tier={} name={}",
                        result.entry.ordinal, result.connected, result.tier, result.rewritten_name
                    );
                    return result;
                }
            };
        }
    }

    fn after_probe(
        &self,
        entry: &ChannelEntry,
        probe: &StreamProbeResult,
        video_description: &mut String,
    ) -> ChannelState {
        match probe.video_track() {
            Some(track) => {
                *video_description = video_track_description(&track);
                debug!("[{}] Video: {video_description}", entry.ordinal);
                ChannelState::VideoFound(track)
            }
            None => ChannelState::NoVideo,
        }
    }

    fn capture(&self, entry: &ChannelEntry, tier: ResolutionTier) -> ChannelState {
        let filename = screenshot_filename(entry.ordinal, &entry.declared_name);
        let output = self.screenshot_dir.join(&filename);

        let captured = self
            .prober
            .capture_frame(
                &entry.url,
                self.timeouts.screenshot,
                self.timeouts.seek,
                &output,
            )
            .and_then(|path| {
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(crate::error::CoreError::CaptureMissing(
                        path.display().to_string(),
                    ))
                }
            });

        match captured {
            Ok(_) => {
                debug!("[{}] Screenshot saved: {filename}", entry.ordinal);
                ChannelState::Reconcile {
                    tier,
                    connected: true,
                    screenshot: Some(filename),
                }
            }
            Err(e) => {
                warn!(
                    "[{}] Screenshot failed, marking {tier} stream as unusable: {e}",
                    entry.ordinal
                );
                ChannelState::Reconcile {
                    tier: ResolutionTier::Error,
                    connected: false,
                    screenshot: None,
                }
            }
        }
    }
}
