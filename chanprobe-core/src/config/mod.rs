//! Configuration structures and constants for the chanprobe-core library.
//!
//! This module provides the configuration for a validation run: where the
//! playlist lives, where outputs go, and the time bounds applied to every
//! external probe and frame capture.

mod builder;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

pub use builder::CoreConfigBuilder;

// Default constants

/// Default upper bound, in seconds, for a single stream probe.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Default upper bound, in seconds, for a single screenshot capture.
/// Capture has to seek into the stream first, so it gets more time than a probe.
pub const DEFAULT_SCREENSHOT_TIMEOUT_SECS: u64 = 15;

/// Default offset, in seconds, into the stream at which the screenshot is taken.
pub const DEFAULT_SEEK_SECS: u64 = 5;

/// Default number of channels probed concurrently (1 = strictly sequential).
pub const DEFAULT_JOBS: usize = 1;

/// Upper limit for the worker pool size.
pub const MAX_JOBS: usize = 32;

/// Main configuration structure for the chanprobe-core library.
///
/// Created by the consumer of the library (e.g., chanprobe-cli) and passed to
/// [`crate::run_playlist`]. Only the two path fields have no meaningful default.
///
/// # Examples
///
/// ```rust
/// use chanprobe_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .playlist_path(PathBuf::from("channels.m3u"))
///     .output_dir(PathBuf::from("audit"))
///     .probe_timeout_secs(8)
///     .screenshot_timeout_secs(20)
///     .jobs(4)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.jobs, 4);
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Extended-M3U playlist to validate
    pub playlist_path: PathBuf,

    /// Directory receiving the report, rewritten playlist, logs and screenshots
    pub output_dir: PathBuf,

    /// Time bound for each stream probe, in seconds
    pub probe_timeout_secs: u64,

    /// Time bound for each screenshot capture, in seconds
    pub screenshot_timeout_secs: u64,

    /// Offset into the stream for the screenshot, in seconds
    pub seek_secs: u64,

    /// Number of channels probed concurrently
    pub jobs: usize,

    /// Optional ntfy.sh topic URL for the run summary notification
    pub ntfy_topic: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            playlist_path: PathBuf::from("playlist.m3u"),
            output_dir: PathBuf::from("."),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            screenshot_timeout_secs: DEFAULT_SCREENSHOT_TIMEOUT_SECS,
            seek_secs: DEFAULT_SEEK_SECS,
            jobs: DEFAULT_JOBS,
            ntfy_topic: None,
        }
    }
}

impl CoreConfig {
    /// Creates a configuration for the given playlist and output directory
    /// with every other field at its default.
    #[must_use]
    pub fn new(playlist_path: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            playlist_path,
            output_dir,
            ..Default::default()
        }
    }

    /// Checks that every field is within its accepted range.
    pub fn validate(&self) -> CoreResult<()> {
        if self.probe_timeout_secs == 0 {
            return Err(CoreError::Config(
                "probe timeout must be at least 1 second".to_string(),
            ));
        }
        if self.screenshot_timeout_secs == 0 {
            return Err(CoreError::Config(
                "screenshot timeout must be at least 1 second".to_string(),
            ));
        }
        if self.jobs == 0 || self.jobs > MAX_JOBS {
            return Err(CoreError::Config(format!(
                "jobs must be between 1 and {MAX_JOBS}, got {}",
                self.jobs
            )));
        }
        if let Some(topic) = &self.ntfy_topic {
            if !topic.starts_with("https://") {
                return Err(CoreError::Config(format!(
                    "ntfy topic '{topic}' must start with https://"
                )));
            }
        }
        Ok(())
    }

    /// Probe time bound as a [`Duration`].
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Screenshot time bound as a [`Duration`].
    #[must_use]
    pub fn screenshot_timeout(&self) -> Duration {
        Duration::from_secs(self.screenshot_timeout_secs)
    }

    /// Screenshot seek offset as a [`Duration`].
    #[must_use]
    pub fn seek(&self) -> Duration {
        Duration::from_secs(self.seek_secs)
    }
}
