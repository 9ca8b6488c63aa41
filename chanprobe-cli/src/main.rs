// chanprobe-cli/src/main.rs
//
// Entry point of the `chanprobe` binary: parse arguments, run the playlist
// check and map a fatal error to a red message on stderr and exit status 1.

use chanprobe_cli::{Cli, run_check};
use clap::Parser;
use owo_colors::OwoColorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_check(cli.check) {
        if std::env::var_os("NO_COLOR").is_none()
            && supports_color::on(supports_color::Stream::Stderr).is_some()
        {
            eprintln!("{}", format!("Error: {e}").red().bold());
        } else {
            eprintln!("Error: {e}");
        }
        if e.is_environment_error() {
            eprintln!("Install FFmpeg (ffprobe and ffmpeg) and make sure both are on PATH.");
        }
        process::exit(1);
    }
}
