// ============================================================================
// chanprobe-core/src/processing/run.rs
// ============================================================================
//
// PLAYLIST RUN: Batch Orchestration
//
// Drives one playlist from file to finished outputs:
//
// 1. Validate the configuration and read the playlist
// 2. Open the output files and screenshot directory
// 3. Parse channels, logging every skipped line
// 4. Process channels (sequentially, or on a rayon pool when jobs > 1)
// 5. Record results in ordinal order and finalize the outputs
// 6. Send the run notification, if a sender was given
//
// Only run-level failures (configuration, unreadable playlist, output write
// errors) end a run early. Per-channel failures are part of the results.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::Prober;
use crate::notifications::{NotificationSender, NotificationType};
use crate::playlist::{ChannelEntry, PlaylistParser, read_playlist};
use crate::processing::channel::{ChannelProcessor, ChannelResult, Timeouts};
use crate::reconcile::Mismatch;
use crate::reporting::{OutputPaths, ReportWriter, RunStatistics};
use crate::terminal::{self, ChannelProgress};

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Outcome of a finished run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Local>,
    pub statistics: RunStatistics,
    pub mismatches: Vec<Mismatch>,
    pub skipped_count: usize,
    pub paths: OutputPaths,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn mismatch_count(&self) -> usize {
        self.mismatches.len()
    }
}

impl Timeouts {
    /// Per-channel bounds taken from a validated configuration.
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            probe: config.probe_timeout(),
            screenshot: config.screenshot_timeout(),
            seek: config.seek(),
        }
    }
}

fn notify(notifier: Option<&dyn NotificationSender>, notification: NotificationType) {
    if let Some(sender) = notifier {
        if let Err(e) = sender.send_notification(&notification) {
            warn!("Failed to send notification: {e}");
        }
    }
}

/// Validates every channel of the configured playlist and writes the outputs.
///
/// # Errors
///
/// * `CoreError::Config` if the configuration is invalid or the worker pool
///   cannot be built
/// * `CoreError::PathError` if the playlist cannot be read
/// * `CoreError::OutputWrite` if any output cannot be created or written
pub fn run_playlist<P>(
    config: &CoreConfig,
    prober: &P,
    notifier: Option<&dyn NotificationSender>,
) -> CoreResult<RunSummary>
where
    P: Prober + ?Sized,
{
    config.validate()?;
    notify(
        notifier,
        NotificationType::RunStarted {
            playlist: config.playlist_path.clone(),
        },
    );

    match execute(config, prober) {
        Ok(summary) => {
            notify(
                notifier,
                NotificationType::RunComplete {
                    playlist: config.playlist_path.clone(),
                    total: summary.statistics.total,
                    connected: summary.statistics.connected_true,
                    mismatches: summary.mismatch_count(),
                    skipped: summary.skipped_count,
                    elapsed: summary.elapsed,
                },
            );
            Ok(summary)
        }
        Err(e) => {
            notify(
                notifier,
                NotificationType::RunError {
                    playlist: config.playlist_path.clone(),
                    message: e.to_string(),
                },
            );
            Err(e)
        }
    }
}

fn execute<P>(config: &CoreConfig, prober: &P) -> CoreResult<RunSummary>
where
    P: Prober + ?Sized,
{
    let started_at = Local::now();
    let started = Instant::now();
    let text = read_playlist(&config.playlist_path)?;
    let mut writer = ReportWriter::create(&config.output_dir)?;

    let mut parser = PlaylistParser::new(text.lines());
    let entries: Vec<ChannelEntry> = parser.by_ref().collect();
    if let Some(header) = parser.header() {
        writer.set_playlist_header(header);
    }
    for skipped in parser.take_skipped() {
        writer.record_skipped(skipped)?;
    }
    info!(
        "Parsed {} channel(s) from {} ({} skipped line(s))",
        entries.len(),
        config.playlist_path.display(),
        writer.events().skipped().len()
    );

    let processor = ChannelProcessor::new(
        prober,
        Timeouts::from_config(config),
        &writer.paths().screenshot_dir,
    );

    let progress = terminal::start_channel_progress(entries.len());
    let recorded = if config.jobs <= 1 {
        process_sequential(&processor, &entries, &progress, &mut writer)
    } else {
        process_parallel(&processor, &entries, config.jobs, &progress, &mut writer)
    };
    progress.finish();
    recorded?;

    let statistics = writer.finalize()?;
    let summary = RunSummary {
        started_at,
        statistics,
        mismatches: writer.events().mismatches().to_vec(),
        skipped_count: writer.events().skipped().len(),
        paths: writer.paths().clone(),
        elapsed: started.elapsed(),
    };
    debug!("Run finished: {summary:?}");
    Ok(summary)
}

/// Records each result as soon as its channel finishes.
fn process_sequential<P>(
    processor: &ChannelProcessor<'_, P>,
    entries: &[ChannelEntry],
    progress: &ChannelProgress,
    writer: &mut ReportWriter,
) -> CoreResult<()>
where
    P: Prober + ?Sized,
{
    for entry in entries {
        let result = processor.process(entry);
        progress.advance();
        writer.record(result)?;
    }
    Ok(())
}

/// Processes channels on a dedicated pool, then records in ordinal order.
fn process_parallel<P>(
    processor: &ChannelProcessor<'_, P>,
    entries: &[ChannelEntry],
    jobs: usize,
    progress: &ChannelProgress,
    writer: &mut ReportWriter,
) -> CoreResult<()>
where
    P: Prober + ?Sized,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .thread_name(|i| format!("chanprobe-worker-{i}"))
        .build()
        .map_err(|e| CoreError::Config(format!("Failed to start {jobs} worker threads: {e}")))?;
    info!("Probing with {jobs} parallel workers");

    // par_iter().map().collect() keeps input order regardless of completion order.
    let results: Vec<ChannelResult> = pool.install(|| {
        entries
            .par_iter()
            .map(|entry| {
                let result = processor.process(entry);
                progress.advance();
                result
            })
            .collect()
    });

    for result in results {
        writer.record(result)?;
    }
    Ok(())
}
