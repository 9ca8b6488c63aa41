// chanprobe-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use chanprobe_core::config::{
    DEFAULT_JOBS, DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_SCREENSHOT_TIMEOUT_SECS, DEFAULT_SEEK_SECS,
};
use clap::Parser;
use clap::builder::TypedValueParser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Chanprobe: IPTV playlist auditor",
    long_about = "Probes every channel of an extended-M3U playlist with ffprobe, captures a \
                  screenshot with ffmpeg, checks the declared resolution tier and writes a \
                  report plus a cleaned playlist."
)]
pub struct Cli {
    #[command(flatten)]
    pub check: CheckArgs,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Extended-M3U playlist to check
    #[arg(value_name = "PLAYLIST")]
    pub playlist: PathBuf,

    /// Directory for the report, playlist, logs and screenshots
    /// (defaults to ./chanprobe_<timestamp>)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Seconds allowed for probing one stream
    #[arg(
        long,
        value_name = "SECONDS",
        env = "CHANPROBE_PROBE_TIMEOUT",
        default_value_t = DEFAULT_PROBE_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub probe_timeout: u64,

    /// Seconds allowed for capturing one screenshot
    #[arg(
        long,
        value_name = "SECONDS",
        env = "CHANPROBE_SCREENSHOT_TIMEOUT",
        default_value_t = DEFAULT_SCREENSHOT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub screenshot_timeout: u64,

    /// Offset into the stream, in seconds, at which the screenshot is taken
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_SEEK_SECS)]
    pub seek: u64,

    /// Number of channels probed in parallel (1-32)
    #[arg(
        short = 'j',
        long,
        value_name = "N",
        default_value_t = DEFAULT_JOBS,
        value_parser = clap::value_parser!(u64).range(1..=32).map(|n| n as usize)
    )]
    pub jobs: usize,

    /// Optional: ntfy.sh topic URL for a run summary notification (e.g., https://ntfy.sh/your_topic)
    /// Can also be set via the CHANPROBE_NTFY_TOPIC environment variable.
    #[arg(long, value_name = "TOPIC_URL", env = "CHANPROBE_NTFY_TOPIC")]
    pub ntfy: Option<String>,

    /// Enable debug-level logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
