//! Implementation of the playlist check.
//!
//! Validates the arguments, prepares the output directory and run log, checks
//! for ffprobe/ffmpeg and hands the playlist to the core library.

use crate::cli::CheckArgs;
use crate::config::default_output_dir;
use crate::error::{CliErrorContext, CliResult};
use crate::logging::{get_timestamp, init_logging, run_log_filename};

use chanprobe_core::notifications::{NotificationSender, NtfyNotificationSender};
use chanprobe_core::{
    CoreConfig, CoreConfigBuilder, CoreError, FfmpegProber, RunSummary, check_required_tools,
    format_duration, run_playlist, terminal,
};

use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Fails unless the playlist exists as a regular file.
pub fn ensure_playlist_exists(playlist: &Path) -> CliResult<()> {
    if playlist.is_file() {
        Ok(())
    } else {
        Err(CoreError::PathError(format!(
            "Playlist file not found: {}",
            playlist.display()
        )))
    }
}

/// Creates and validates CoreConfig from CLI arguments.
pub fn create_core_config(args: &CheckArgs, output_dir: PathBuf) -> CliResult<CoreConfig> {
    let mut builder = CoreConfigBuilder::new()
        .playlist_path(args.playlist.clone())
        .output_dir(output_dir)
        .probe_timeout_secs(args.probe_timeout)
        .screenshot_timeout_secs(args.screenshot_timeout)
        .seek_secs(args.seek)
        .jobs(args.jobs);
    if let Some(topic) = &args.ntfy {
        builder = builder.ntfy_topic(topic);
    }
    builder.build()
}

fn create_notifier(config: &CoreConfig) -> Option<NtfyNotificationSender> {
    let topic = config.ntfy_topic.as_deref()?;
    match NtfyNotificationSender::new(topic) {
        Ok(sender) => Some(sender),
        Err(e) => {
            terminal::print_warning(&format!("Notifications disabled: {e}"));
            None
        }
    }
}

fn display_initialization_info(config: &CoreConfig, log_path: &Path) {
    terminal::print_section("INITIALIZATION");
    terminal::print_status("Playlist", &config.playlist_path.display().to_string(), false);
    terminal::print_status("Output", &config.output_dir.display().to_string(), false);
    terminal::print_status("Run log", &log_path.display().to_string(), false);
    terminal::print_status("Probe timeout", &format!("{}s", config.probe_timeout_secs), false);
    terminal::print_status(
        "Capture timeout",
        &format!("{}s (seek {}s)", config.screenshot_timeout_secs, config.seek_secs),
        false,
    );
    terminal::print_status("Workers", &config.jobs.to_string(), false);
    if let Some(topic) = &config.ntfy_topic {
        terminal::print_status("Notifications", topic, false);
    }
}

fn display_summary(summary: &RunSummary) {
    let stats = &summary.statistics;

    terminal::print_section("RESULTS");
    terminal::print_status(
        "Started",
        &summary.started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        false,
    );
    terminal::print_status("Channels", &stats.total.to_string(), true);
    terminal::print_status("Connected", &stats.connected_true.to_string(), false);
    terminal::print_status("Not connected", &stats.connected_false.to_string(), false);

    terminal::print_processing("Resolution tiers");
    terminal::print_tier_counts(stats.tier_counts());

    terminal::print_processing("Findings");
    terminal::print_status(
        "Mismatches",
        &summary.mismatch_count().to_string(),
        summary.mismatch_count() > 0,
    );
    for mismatch in &summary.mismatches {
        terminal::print_sub_item(&mismatch.to_string());
    }
    terminal::print_status("Skipped lines", &summary.skipped_count.to_string(), false);

    terminal::print_processing("Outputs");
    terminal::print_status("Report", &summary.paths.report.display().to_string(), false);
    terminal::print_status("Playlist", &summary.paths.playlist.display().to_string(), false);
    terminal::print_status(
        "Screenshots",
        &summary.paths.screenshot_dir.display().to_string(),
        false,
    );

    terminal::print_success(&format!(
        "Checked {} channel(s), {} connected",
        stats.total, stats.connected_true
    ));
    terminal::print_status(
        "Total time",
        &format_duration(summary.elapsed.as_secs_f64()),
        true,
    );
}

/// Runs a full playlist check and prints the summary.
pub fn run_check(args: CheckArgs) -> CliResult<RunSummary> {
    ensure_playlist_exists(&args.playlist)?;

    let timestamp = get_timestamp();
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&timestamp));
    let config = create_core_config(&args, output_dir)?;

    fs::create_dir_all(&config.output_dir).cli_context(format!(
        "Failed to create output directory '{}'",
        config.output_dir.display()
    ))?;
    let log_path = config.output_dir.join(run_log_filename(&timestamp));
    init_logging(args.verbose, &log_path)?;

    display_initialization_info(&config, &log_path);
    debug!("Run started: {}", chrono::Local::now());

    terminal::print_section("DEPENDENCIES");
    check_required_tools()?;
    terminal::print_status("ffprobe", "found", false);
    terminal::print_status("ffmpeg", "found", false);

    let notifier = create_notifier(&config);

    terminal::print_section("CHANNELS");
    let prober = FfmpegProber::new();
    let summary = match run_playlist(
        &config,
        &prober,
        notifier.as_ref().map(|n| n as &dyn NotificationSender),
    ) {
        Ok(summary) => summary,
        Err(e) => {
            terminal::print_error("Fatal error during the run", &e.to_string(), None);
            return Err(e);
        }
    };

    display_summary(&summary);
    if summary.statistics.total == 0 {
        warn!("The playlist contained no usable channels");
    }
    debug!("Finished at: {}", chrono::Local::now());
    Ok(summary)
}
