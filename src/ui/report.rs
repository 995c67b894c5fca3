//! End-of-run reporting: failure explanation and the `--json` report

use std::path::{Path, PathBuf};

use console::Style;
use miette::Diagnostic;
use serde::Serialize;

use crate::workflow::{RunOutcome, Stage, WorkflowFailure};

/// Lines explaining a failure, including where the app is now
pub fn failure_lines(failure: &WorkflowFailure) -> Vec<String> {
    let mut lines = vec![format!("Error: {failure}")];

    if let Some(help) = failure.error.help() {
        lines.push(format!("  help: {help}"));
    }

    if let Some(change) = &failure.change {
        lines.push(format!(
            "  CFBundleIdentifier was already changed from '{}' to '{}'",
            change.old, change.new
        ));
    }

    if let Some(location) = failure.displaced_location() {
        lines.push(format!("  The app is currently at: {}", location.display()));
        if let Some(parent) = failure.original.as_deref().and_then(Path::parent) {
            let mv = if failure.elevated { "sudo mv" } else { "mv" };
            lines.push(format!(
                "  To move it back: {mv} \"{}\" \"{}/\"",
                location.display(),
                parent.display()
            ));
        }
    } else if let Some(original) = &failure.original {
        let note = match failure.stage {
            Stage::Elevating => format!("  No changes were made to {}", original.display()),
            _ => format!("  The app is still at {}", original.display()),
        };
        lines.push(note);
    }

    lines
}

/// Print a failure explanation to stderr
pub fn print_failure(failure: &WorkflowFailure) {
    let error_style = Style::new().for_stderr().bold().red();
    for (i, line) in failure_lines(failure).iter().enumerate() {
        if i == 0 {
            eprintln!("{}", error_style.apply_to(line));
        } else {
            eprintln!("{line}");
        }
    }
}

/// Machine-readable summary of a run
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub status: &'static str,
    pub stage: Stage,
    pub target: Option<PathBuf>,
    pub location: Option<PathBuf>,
    pub old_identifier: Option<String>,
    pub new_identifier: Option<String>,
    pub elevated: bool,
    pub resigned: bool,
    pub error: Option<String>,
    pub expected_failure: bool,
}

impl RunReport {
    pub fn success(outcome: &RunOutcome) -> Self {
        Self {
            status: "ok",
            stage: Stage::Done,
            target: Some(outcome.original.clone()),
            location: Some(outcome.location.clone()),
            old_identifier: Some(outcome.change.old.to_string()),
            new_identifier: Some(outcome.change.new.to_string()),
            elevated: outcome.elevated,
            resigned: outcome.resigned,
            error: None,
            expected_failure: false,
        }
    }

    pub fn failure(failure: &WorkflowFailure) -> Self {
        Self {
            status: "failed",
            stage: failure.stage,
            target: failure.original.clone(),
            location: failure.location.clone(),
            old_identifier: failure.change.as_ref().map(|c| c.old.to_string()),
            new_identifier: failure.change.as_ref().map(|c| c.new.to_string()),
            elevated: failure.elevated,
            resigned: false,
            error: Some(failure.error.to_string()),
            expected_failure: failure.error.is_expected_for_protected_apps(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            format!("{{\"status\":\"{}\",\"error\":\"report serialization failed: {e}\"}}", self.status)
        })
    }
}
