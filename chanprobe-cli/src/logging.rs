// ============================================================================
// chanprobe-cli/src/logging.rs
// ============================================================================
//
// LOGGING: Console and Run Log Setup
//
// The core library logs through the `log` facade. This module installs a
// `fern` dispatcher with two sinks:
//
// - the console (stdout): bare messages, colored when the terminal supports it
// - the run log file: timestamped, leveled, ANSI escapes stripped
//
// `--verbose` raises both sinks from Info to Debug.

use crate::error::CliResult;

use chanprobe_core::CoreError;
use log::LevelFilter;
use std::io::IsTerminal;
use std::path::Path;

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// ```
/// let log_filename = format!("chanprobe_run_{}.log", chanprobe_cli::logging::get_timestamp());
/// assert!(log_filename.len() > "chanprobe_run_.log".len());
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Name of the run log file for a given timestamp.
pub fn run_log_filename(timestamp: &str) -> String {
    format!("chanprobe_run_{timestamp}.log")
}

/// Whether console output should carry ANSI colors.
///
/// `NO_COLOR` always wins; otherwise stdout must be a terminal that supports color.
pub fn console_supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
        && supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Installs the global logger.
///
/// # Errors
///
/// * `CoreError::OutputWrite` if the run log file cannot be created
/// * `CoreError::Config` if a global logger is already installed
pub fn init_logging(verbose: bool, log_file: &Path) -> CliResult<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let use_color = console_supports_color();
    console::set_colors_enabled(use_color);

    let console_sink = fern::Dispatch::new()
        .format(move |out, message, _record| {
            if use_color {
                out.finish(format_args!("{message}"))
            } else {
                out.finish(format_args!(
                    "{}",
                    strip_ansi_escapes::strip_str(message.to_string())
                ))
            }
        })
        .chain(std::io::stdout());

    let file = fern::log_file(log_file)
        .map_err(|e| chanprobe_core::error::output_write_error(log_file, e))?;
    let file_sink = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                strip_ansi_escapes::strip_str(message.to_string())
            ))
        })
        .chain(file);

    fern::Dispatch::new()
        .level(level)
        .level_for("ureq", LevelFilter::Warn)
        .level_for("rustls", LevelFilter::Warn)
        .chain(console_sink)
        .chain(file_sink)
        .apply()
        .map_err(|e| CoreError::Config(format!("Failed to initialize logging: {e}")))?;

    log::debug!("Logger initialized with level: {level}");
    Ok(())
}
