//! Terminal UI components and styling for chanprobe.
//!
//! Output goes through the `log` facade so the console and the run log file
//! receive the same lines. A hierarchical layout with minimal symbols keeps
//! the console readable: sections, processing steps, key/value status lines.

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

use crate::tier::ResolutionTier;

/// Visual hierarchy levels of console output.
#[derive(Debug, Clone, Copy)]
pub enum OutputLevel {
    /// Main sections (===== SECTION =====)
    Section,
    /// Processing steps (» Step)
    Subsection,
    /// Items under a step
    Progress,
    /// Key/value status lines
    Status,
}

impl OutputLevel {
    fn indent(&self) -> &'static str {
        match self {
            OutputLevel::Section => "",
            OutputLevel::Subsection => "  ",
            OutputLevel::Progress => "    ",
            OutputLevel::Status => "      ",
        }
    }
}

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a section header for major workflow phases
pub fn print_section(title: &str) {
    info!("");
    if should_use_color() {
        info!("===== {} =====", title.to_uppercase().cyan());
    } else {
        info!("===== {} =====", title.to_uppercase());
    }
    info!("");
}

fn print_item(level: OutputLevel, symbol: Option<&str>, text: &str, bold: bool) {
    let indent = level.indent();
    let symbol = symbol.map(|s| format!("{s} ")).unwrap_or_default();
    if should_use_color() && bold {
        info!("{indent}{symbol}{}", style(text).bold());
    } else {
        info!("{indent}{symbol}{text}");
    }
}

/// Print a processing step
pub fn print_processing(message: &str) {
    info!("");
    print_item(OutputLevel::Subsection, Some("»"), message, true);
}

/// Print a sub-item under a processing step
pub fn print_sub_item(message: &str) {
    print_item(OutputLevel::Progress, None, message, false);
}

/// Print a status line (key-value pair)
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let label_width = 15;
    let padding = if label.width() < label_width {
        label_width - label.width()
    } else {
        1
    };
    let indent = OutputLevel::Status.indent();
    let spaces = " ".repeat(padding);

    if should_use_color() && highlight {
        info!("{indent}{label}:{spaces} {}", value.bold());
    } else {
        info!("{indent}{label}:{spaces} {value}");
    }
}

/// Print the per-tier counts of a run, using the tier labels of the report.
pub fn print_tier_counts<I>(counts: I)
where
    I: IntoIterator<Item = (ResolutionTier, usize)>,
{
    for (tier, count) in counts {
        let highlight = tier == ResolutionTier::Error && count > 0;
        print_status(tier.label(), &count.to_string(), highlight);
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    info!("");
    if should_use_color() {
        info!("  ✓ {}", message.green());
    } else {
        info!("  ✓ {message}");
    }
}

/// Print a warning message
pub fn print_warning(message: &str) {
    if should_use_color() {
        info!("  ⚠ {}", message.yellow());
    } else {
        info!("  ⚠ {message}");
    }
}

/// Print an error message
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    if should_use_color() {
        info!("✗ {}", title.red().bold());
    } else {
        info!("✗ {title}");
    }

    info!("");
    info!("  Message:  {message}");

    if let Some(suggestion_text) = suggestion {
        info!("");
        info!("  Suggestion: {suggestion_text}");
    }

    info!("");
}

/// Progress bar over the channels of one run.
///
/// Each run owns its own bar, so concurrent runs never share progress state.
/// Cloning yields a handle to the same bar; `advance` is safe from worker
/// threads.
#[derive(Clone)]
pub struct ChannelProgress {
    bar: ProgressBar,
}

impl ChannelProgress {
    /// Current number of finished channels.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Advances the bar by one channel.
    pub fn advance(&self) {
        self.bar.inc(1);
    }

    /// Finishes the bar, leaving its final state visible.
    pub fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish();
        }
    }
}

/// Starts a channel progress bar. Hidden when stderr is not a terminal.
pub fn start_channel_progress(total: usize) -> ChannelProgress {
    let pb = ProgressBar::new(total as u64);
    if let Ok(template) = ProgressStyle::default_bar()
        .template("  ⧖ Channels: {pos}/{len} [{bar:30}] ({elapsed_precise}, ETA {eta_precise})")
    {
        pb.set_style(template.progress_chars("##."));
    }
    if !std::io::stderr().is_terminal() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.enable_steady_tick(Duration::from_millis(200));
    ChannelProgress { bar: pb }
}
