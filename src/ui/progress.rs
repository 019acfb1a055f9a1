//! Progress reporting

use crate::copier::CopyStats;
use console::style;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Console reporter for a copy run
///
/// Shows a spinner with the current entry on interactive terminals. All line
/// output goes through [`ProgressBar::suspend`] so it never interleaves with
/// the spinner.
pub struct Reporter {
    bar: ProgressBar,
}

impl Reporter {
    /// Create a reporter. Verbose runs print one line per action instead of
    /// drawing a spinner.
    pub fn new(verbose: bool) -> Self {
        let bar = if verbose {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            bar.enable_steady_tick(Duration::from_millis(120));
            if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
                bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
            }
            bar
        };
        Self { bar }
    }

    /// Update current entry indicator.
    pub fn set_current(&self, path: &Path) {
        self.bar.set_message(format!("Copying {}", path.display()));
    }

    /// Print a line on stdout
    pub fn info(&self, line: &str) {
        self.bar.suspend(|| println!("{line}"));
    }

    /// Print a `warning:` line on stderr
    pub fn warn(&self, message: &str) {
        self.bar.suspend(|| {
            eprintln!(
                "{}: {}",
                style("warning").yellow().bold().for_stderr(),
                message
            )
        });
    }

    /// Print a block of text on stderr
    pub fn report_errors(&self, text: &str) {
        self.bar.suspend(|| eprintln!("{text}"));
    }

    /// Clear the spinner and print the run summary
    pub fn finish(&self, stats: &CopyStats) {
        self.bar.finish_and_clear();
        println!("{}", format_summary(stats));
    }

    /// Clear the spinner without a summary
    pub fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}

/// One-line summary of a finished run
pub fn format_summary(stats: &CopyStats) -> String {
    let mut summary = format!(
        "Copied {} file(s) ({}) and {} folder(s); {} alias(es) resolved, {} unresolved",
        stats.files_copied,
        HumanBytes(stats.bytes_copied),
        stats.directories_created,
        stats.aliases_resolved,
        stats.aliases_unresolved
    );
    if stats.failed_entries > 0 {
        summary.push_str(&format!("; {} failed", stats.failed_entries));
    }
    summary
}
