// ============================================================================
// chanprobe-core/src/reporting/mod.rs
// ============================================================================
//
// REPORT WRITER: Durable Outputs of a Validation Run
//
// Owns every output file of a run and the run-wide statistics. Results are
// handed over one at a time, in ordinal order, and written immediately:
//
// - report.csv           one row per channel (UTF-8 BOM, localized header)
// - playlist_valid.m3u   connected channels only, names rewritten
// - mismatch.log         declared/measured tier disagreements
// - skipped_lines.log    lines the playlist parser rejected
//
// Any failure to create or write these files is fatal for the run.

mod csv;
mod statistics;

pub use csv::escape_field;
pub use statistics::{EventLog, RunStatistics};

use crate::error::{CoreResult, output_write_error};
use crate::playlist::{HEADER_MARKER, SkippedLine, rewrite_metadata_line};
use crate::processing::ChannelResult;
use crate::reconcile::Mismatch;

use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the tabular report.
pub const REPORT_FILE: &str = "report.csv";
/// File name of the rewritten playlist.
pub const PLAYLIST_FILE: &str = "playlist_valid.m3u";
/// File name of the mismatch log.
pub const MISMATCH_LOG_FILE: &str = "mismatch.log";
/// File name of the skipped-lines log.
pub const SKIPPED_LOG_FILE: &str = "skipped_lines.log";
/// Directory holding the screenshots.
pub const SCREENSHOT_DIR: &str = "screenshots";

const UTF8_BOM: &str = "\u{feff}";

/// Report column headers: ordinal, channel name, video track, audio track,
/// screenshot file, connect flag, resolution flag.
pub const REPORT_HEADER: [&str; 7] = [
    "序号",
    "频道名称",
    "视频轨道",
    "音频轨道",
    "截图文件",
    "连接状态",
    "分辨率标记",
];

/// Locations of everything a run writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub report: PathBuf,
    pub playlist: PathBuf,
    pub mismatch_log: PathBuf,
    pub skipped_log: PathBuf,
    pub screenshot_dir: PathBuf,
}

impl OutputPaths {
    #[must_use]
    pub fn in_dir(output_dir: &Path) -> Self {
        Self {
            report: output_dir.join(REPORT_FILE),
            playlist: output_dir.join(PLAYLIST_FILE),
            mismatch_log: output_dir.join(MISMATCH_LOG_FILE),
            skipped_log: output_dir.join(SKIPPED_LOG_FILE),
            screenshot_dir: output_dir.join(SCREENSHOT_DIR),
        }
    }
}

/// An output file and the path it was opened at, for error reporting.
struct Sink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl Sink {
    fn create(path: PathBuf) -> CoreResult<Self> {
        let file = File::create(&path).map_err(|e| output_write_error(&path, e))?;
        debug!("Opened output {}", path.display());
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    fn write_line(&mut self, line: &str) -> CoreResult<()> {
        writeln!(self.writer, "{line}").map_err(|e| output_write_error(&self.path, e))
    }

    fn write_raw(&mut self, text: &str) -> CoreResult<()> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|e| output_write_error(&self.path, e))
    }

    fn flush(&mut self) -> CoreResult<()> {
        self.writer
            .flush()
            .map_err(|e| output_write_error(&self.path, e))
    }
}

/// Accumulates channel results into the run's output files.
pub struct ReportWriter {
    paths: OutputPaths,
    report: Sink,
    playlist: Sink,
    mismatch_log: Sink,
    skipped_log: Sink,
    playlist_header: Option<String>,
    playlist_header_written: bool,
    statistics: RunStatistics,
    events: EventLog,
    finalized: bool,
}

impl ReportWriter {
    /// Creates the output directory and opens every output file.
    ///
    /// # Errors
    ///
    /// * `CoreError::OutputWrite` if the directory or any file cannot be created
    pub fn create(output_dir: &Path) -> CoreResult<Self> {
        let paths = OutputPaths::in_dir(output_dir);
        fs::create_dir_all(&paths.screenshot_dir)
            .map_err(|e| output_write_error(&paths.screenshot_dir, e))?;

        let mut report = Sink::create(paths.report.clone())?;
        report.write_raw(UTF8_BOM)?;
        report.write_line(&REPORT_HEADER.join(","))?;

        Ok(Self {
            playlist: Sink::create(paths.playlist.clone())?,
            mismatch_log: Sink::create(paths.mismatch_log.clone())?,
            skipped_log: Sink::create(paths.skipped_log.clone())?,
            report,
            paths,
            playlist_header: None,
            playlist_header_written: false,
            statistics: RunStatistics::default(),
            events: EventLog::default(),
            finalized: false,
        })
    }

    /// Sets the header line of the rewritten playlist. Has no effect once the
    /// header has been written.
    pub fn set_playlist_header(&mut self, header: &str) {
        if !self.playlist_header_written {
            self.playlist_header = Some(header.to_string());
        }
    }

    fn ensure_playlist_header(&mut self) -> CoreResult<()> {
        if !self.playlist_header_written {
            let header = self
                .playlist_header
                .clone()
                .unwrap_or_else(|| HEADER_MARKER.to_string());
            self.playlist.write_line(&header)?;
            self.playlist_header_written = true;
        }
        Ok(())
    }

    /// Records one finished channel.
    pub fn record(&mut self, result: ChannelResult) -> CoreResult<()> {
        let row = [
            result.entry.ordinal.to_string(),
            result.entry.declared_name.clone(),
            result.video_track_description.clone(),
            result.audio_track_description.clone(),
            result.screenshot_filename.clone(),
            result.connected.to_string(),
            result.tier.label().to_string(),
        ];
        let line = row
            .iter()
            .map(|field| escape_field(field))
            .collect::<Vec<_>>()
            .join(",");
        self.report.write_line(&line)?;

        if result.connected {
            self.ensure_playlist_header()?;
            let metadata =
                rewrite_metadata_line(&result.entry.metadata_line, &result.rewritten_name);
            self.playlist.write_line(&metadata)?;
            self.playlist.write_line(&result.entry.url)?;
        }

        if let Some(mismatch) = &result.mismatch {
            self.record_mismatch(mismatch.clone())?;
        }

        self.statistics.update(&result);
        Ok(())
    }

    fn record_mismatch(&mut self, mismatch: Mismatch) -> CoreResult<()> {
        self.mismatch_log.write_line(&mismatch.to_string())?;
        self.events.record_mismatch(mismatch);
        Ok(())
    }

    /// Records a line rejected by the playlist parser.
    pub fn record_skipped(&mut self, line: SkippedLine) -> CoreResult<()> {
        self.skipped_log.write_line(&line.to_string())?;
        self.events.record_skipped(line);
        Ok(())
    }

    /// Flushes every output and returns the final counts. Calling it again
    /// returns the same counts without rewriting anything.
    pub fn finalize(&mut self) -> CoreResult<RunStatistics> {
        if !self.finalized {
            self.ensure_playlist_header()?;
            for sink in [
                &mut self.report,
                &mut self.playlist,
                &mut self.mismatch_log,
                &mut self.skipped_log,
            ] {
                sink.flush()?;
            }
            self.finalized = true;
            info!(
                "Outputs written: {}, {}",
                self.paths.report.display(),
                self.paths.playlist.display()
            );
        }
        Ok(self.statistics.clone())
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }
}
