//! Core library for auditing IPTV playlists with ffprobe and ffmpeg.
//!
//! This crate parses M3U playlists, probes every channel's stream, classifies
//! its resolution tier, captures a screenshot, reconciles the tier with the
//! one declared in the channel name and writes a report, a cleaned playlist
//! and event logs.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use chanprobe_core::{CoreConfig, FfmpegProber, run_playlist};
//! use chanprobe_core::notifications::NtfyNotificationSender;
//! use std::path::PathBuf;
//!
//! let mut config = CoreConfig::new(
//!     PathBuf::from("/path/to/playlist.m3u"),
//!     PathBuf::from("/path/to/output"),
//! );
//! config.jobs = 4;
//! config.validate().unwrap();
//!
//! let notifier = NtfyNotificationSender::new("https://ntfy.sh/my-topic").unwrap();
//! let summary = run_playlist(&config, &FfmpegProber::new(), Some(&notifier)).unwrap();
//! println!(
//!     "{} of {} channels connected",
//!     summary.statistics.connected_true, summary.statistics.total
//! );
//! ```

pub mod config;
pub mod error;
pub mod external;
pub mod notifications;
pub mod playlist;
pub mod processing;
pub mod reconcile;
pub mod reporting;
pub mod terminal;
pub mod tier;
pub mod util;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{CoreError, CoreResult};
pub use external::{FfmpegProber, Prober, StreamProbeResult, check_required_tools};
pub use notifications::{NotificationSender, NtfyNotificationSender};
pub use playlist::{ChannelEntry, PlaylistParser, SkippedLine};
pub use processing::{ChannelProcessor, ChannelResult, RunSummary, Timeouts, run_playlist};
pub use reconcile::Mismatch;
pub use reporting::{ReportWriter, RunStatistics};
pub use tier::{ResolutionTier, classify};
pub use util::format_duration;
