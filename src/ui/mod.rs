//! Operator-facing presentation layer
//!
//! This module handles:
//! - The step-by-step narrative of a run (stage headers, identifier change, final location)
//! - A spinner for the long-running signing steps, using indicatif
//! - Silent output for `--json` mode
//!
//! All narrative goes through the [`Reporter`] trait so the workflow never prints directly.

pub mod report;

use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::workflow::Stage;

/// Receives progress from the workflow
pub trait Reporter {
    /// A new stage has started
    fn stage(&mut self, stage: Stage, message: &str);

    /// Informational line within the current stage
    fn info(&mut self, message: &str);

    /// A blocking external step is starting
    fn begin_step(&mut self, message: &str);

    /// The current step succeeded
    fn finish_step(&mut self);

    /// The current step failed
    fn abandon_step(&mut self);
}

/// Styled terminal output with a spinner for external steps
#[derive(Default)]
pub struct ConsoleReporter {
    spinner: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Reporter for ConsoleReporter {
    fn stage(&mut self, stage: Stage, message: &str) {
        let style = if stage == Stage::Done {
            Style::new().bold().green()
        } else {
            Style::new().bold().cyan()
        };
        println!("{} {}", style.apply_to(format!("[{stage}]")), message);
    }

    fn info(&mut self, message: &str) {
        println!("  {message}");
    }

    fn begin_step(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn finish_step(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            let message = spinner.message();
            spinner.finish_and_clear();
            println!("  {} {}", Style::new().green().apply_to("✓"), message);
        }
    }

    fn abandon_step(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            let message = spinner.message();
            spinner.finish_and_clear();
            println!("  {} {}", Style::new().red().apply_to("✗"), message);
        }
    }
}

/// Reporter that prints nothing
///
/// Used with `--json`, where stdout carries only the machine-readable report.
#[derive(Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn stage(&mut self, _stage: Stage, _message: &str) {
        // No-op for silent mode
    }

    fn info(&mut self, _message: &str) {
        // No-op for silent mode
    }

    fn begin_step(&mut self, _message: &str) {
        // No-op for silent mode
    }

    fn finish_step(&mut self) {
        // No-op for silent mode
    }

    fn abandon_step(&mut self) {
        // No-op for silent mode
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_reporter_no_ops() {
        let mut reporter = SilentReporter;

        // All methods should do nothing and not panic
        reporter.stage(Stage::Validating, "Checking /tmp/App.app");
        reporter.info("nothing to see");
        reporter.begin_step("Signing");
        reporter.finish_step();
        reporter.abandon_step();
    }

    #[test]
    fn test_console_reporter_step_lifecycle() {
        let mut reporter = ConsoleReporter::new();
        reporter.begin_step("Clearing extended attributes");
        assert!(reporter.spinner.is_some());
        reporter.finish_step();
        assert!(reporter.spinner.is_none());
    }

    #[test]
    fn test_console_reporter_abandon_without_step() {
        let mut reporter = ConsoleReporter::new();
        reporter.abandon_step();
        assert!(reporter.spinner.is_none());
    }
}
