//! Bounded execution of external commands.
//!
//! Every probe and capture runs through [`run_with_timeout`]. The child gets a
//! null stdin so it can never read from whatever the parent is reading (the
//! playlist, when the parent's stdin is redirected from it). Output pipes are
//! drained on background threads so a chatty child cannot block on a full pipe
//! while we wait for it.

use crate::error::{CoreResult, command_start_error, command_timeout_error};

use log::{debug, trace};
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Interval between exit-status polls.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured result of a command that ran to completion.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Stderr as lossy UTF-8, trimmed.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Runs `cmd` with an isolated stdin and kills it if it outlives `timeout`.
///
/// A non-zero exit status is not an error here; callers decide whether the
/// captured output is still usable.
///
/// # Errors
///
/// * `CoreError::CommandStart` if the process cannot be spawned
/// * `CoreError::CommandTimeout` if it is still running after `timeout`
pub fn run_with_timeout(
    cmd: &mut Command,
    label: &str,
    timeout: Duration,
) -> CoreResult<CommandOutput> {
    debug!("Running {label}: {cmd:?}");

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| command_start_error(label, e))?;

    let stdout_handle = child.stdout.take().map(|mut out| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = out.read_to_end(&mut buf);
            buf
        })
    });
    let stderr_handle = child.stderr.take().map(|mut err| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = err.read_to_end(&mut buf);
            buf
        })
    });

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if start.elapsed() >= timeout => {
                stop_child(&mut child);
                debug!("{label} killed after {:.1}s", start.elapsed().as_secs_f64());
                return Err(command_timeout_error(label, timeout.as_secs()));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                stop_child(&mut child);
                return Err(command_start_error(label, e));
            }
        }
    };

    let stdout = stdout_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    let stderr = stderr_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();

    trace!(
        "{label} exited with {status} after {:.2}s ({} bytes stdout)",
        start.elapsed().as_secs_f64(),
        stdout.len()
    );

    Ok(CommandOutput {
        status,
        stdout,
        stderr,
    })
}

/// Kills and reaps a child that is no longer being waited on normally.
fn stop_child(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
