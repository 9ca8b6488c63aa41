//! Shared helpers for process execution, file naming and formatting.

pub mod command;

pub use command::{CommandOutput, run_with_timeout};

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Makes a channel name safe to use as part of a file name.
///
/// Path separators, characters reserved on common filesystems, whitespace and
/// `%` become `_`. ffmpeg's image muxer reads `%d` in an output name as a
/// sequence pattern. Non-ASCII letters are kept.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '%' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        "channel".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Screenshot file name for a channel.
#[must_use]
pub fn screenshot_filename(ordinal: usize, name: &str) -> String {
    format!("{ordinal:04}_{}.jpg", sanitize_filename(name))
}
