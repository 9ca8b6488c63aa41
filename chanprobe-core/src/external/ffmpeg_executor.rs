// ============================================================================
// chanprobe-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: Single-Frame Capture From a Live Stream
//
// Builds the ffmpeg invocation with ffmpeg-sidecar's command builder and runs
// it through the bounded executor. A capture only counts as successful when
// ffmpeg exits cleanly AND the image file exists and is not empty.

use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::util::run_with_timeout;

use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Builds the ffmpeg command that grabs one frame `seek` into `url`.
pub(crate) fn build_capture_command(url: &str, seek: Duration, output: &Path) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.hide_banner()
        .args(["-nostdin", "-loglevel", "error"])
        .overwrite()
        .seek(seek.as_secs().to_string())
        .input(url)
        .frames(1)
        .output(output.to_string_lossy().into_owned());
    cmd
}

/// Captures one frame from `url` into `output`.
///
/// # Errors
///
/// * `CoreError::CommandTimeout` when the capture runs past `timeout`
/// * `CoreError::CommandFailed` when ffmpeg exits non-zero
/// * `CoreError::CaptureMissing` when ffmpeg succeeds but no image was written
pub fn capture_frame(
    url: &str,
    timeout: Duration,
    seek: Duration,
    output: &Path,
) -> CoreResult<PathBuf> {
    log::debug!("Capturing frame at {}s from {url}", seek.as_secs());

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut cmd = build_capture_command(url, seek, output);
    let result = run_with_timeout(cmd.as_inner_mut(), "ffmpeg", timeout);

    let outcome = match result {
        Ok(out) if !out.status.success() => {
            Err(command_failed_error("ffmpeg", out.status, out.stderr_text()))
        }
        Ok(_) if !is_non_empty_file(output) => Err(CoreError::CaptureMissing(
            output.display().to_string(),
        )),
        Ok(_) => Ok(output.to_path_buf()),
        Err(e) => Err(e),
    };

    if outcome.is_err() && output.exists() {
        // A killed or failed capture can leave a truncated image behind.
        let _ = std::fs::remove_file(output);
    }

    outcome
}

fn is_non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}
