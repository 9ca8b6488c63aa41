// ============================================================================
// chanprobe-core/src/notifications/abstraction.rs
// ============================================================================
//
// NOTIFICATION ABSTRACTION: Run Notifications and the Sender Seam
//
// Defines the notifications a run can emit and the trait that delivers them.
// The run itself never depends on a concrete backend; the CLI decides whether
// to hand in an ntfy sender or nothing at all.

use crate::error::CoreResult;
use crate::util::format_duration;

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Notifications emitted over the course of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationType {
    /// A playlist run has started
    RunStarted {
        playlist: PathBuf,
    },

    /// A playlist run finished and wrote its outputs
    RunComplete {
        playlist: PathBuf,
        total: usize,
        connected: usize,
        mismatches: usize,
        skipped: usize,
        elapsed: Duration,
    },

    /// A playlist run stopped on a fatal error
    RunError {
        playlist: PathBuf,
        message: String,
    },
}

fn playlist_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

impl NotificationType {
    pub fn get_title(&self) -> String {
        match self {
            NotificationType::RunStarted { .. } => "Playlist Check Started".to_string(),
            NotificationType::RunComplete { .. } => "Playlist Check Complete".to_string(),
            NotificationType::RunError { .. } => "Playlist Check Failed".to_string(),
        }
    }

    pub fn get_message(&self) -> String {
        match self {
            NotificationType::RunStarted { playlist } => {
                format!("Started checking {}", playlist_name(playlist))
            }
            NotificationType::RunComplete {
                playlist,
                total,
                connected,
                mismatches,
                skipped,
                elapsed,
            } => format!(
                "Checked {} in {}: {connected}/{total} channels connected, {mismatches} tier mismatches, {skipped} skipped lines",
                playlist_name(playlist),
                format_duration(elapsed.as_secs_f64()),
            ),
            NotificationType::RunError { playlist, message } => {
                format!("Error checking {}: {message}", playlist_name(playlist))
            }
        }
    }

    /// Priority level, 1 (lowest) to 5 (highest).
    pub fn get_priority(&self) -> u8 {
        match self {
            NotificationType::RunStarted { .. } => 3,
            NotificationType::RunComplete { .. } => 4,
            NotificationType::RunError { .. } => 5,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            NotificationType::RunStarted { .. } => "start",
            NotificationType::RunComplete { .. } => "complete",
            NotificationType::RunError { .. } => "error",
        }
    }
}

/// Delivers run notifications to some backend.
pub trait NotificationSender: Send + Sync {
    fn send_notification(&self, notification: &NotificationType) -> CoreResult<()>;
}

/// Sender that drops every notification.
#[derive(Debug, Clone, Default)]
pub struct NullNotificationSender;

impl NotificationSender for NullNotificationSender {
    fn send_notification(&self, _notification: &NotificationType) -> CoreResult<()> {
        Ok(())
    }
}
