// chanprobe-cli/src/config.rs
//
// Defaults that only the command-line front end needs.

use std::path::PathBuf;

/// Prefix of the default output directory name.
pub const DEFAULT_OUTPUT_PREFIX: &str = "chanprobe";

/// Output directory used when `--output` is not given: `./chanprobe_<timestamp>`.
pub fn default_output_dir(timestamp: &str) -> PathBuf {
    PathBuf::from(format!("{DEFAULT_OUTPUT_PREFIX}_{timestamp}"))
}
