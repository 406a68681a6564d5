//! Shared helpers for the `run` and `check` commands.

use crate::config::ValueTable;
use crate::error::Result;
use crate::lint::{LintDiagnostic, Severity};
use crate::steps::Step;
use crate::ui::UserInterface;
use regex::Regex;

/// Parse the `--vals` flag. A missing or blank flag is an empty table.
pub fn parse_vals(raw: Option<&str>) -> Result<ValueTable> {
    match raw.map(str::trim) {
        None | Some("") => Ok(ValueTable::new()),
        Some(json) => ValueTable::from_json(json).map_err(|e| {
            anyhow::anyhow!("--vals must be a JSON object of strings: {}", e).into()
        }),
    }
}

/// One line describing a step, e.g. `  2. Runner     CreateGroup`.
pub fn step_line(index: usize, step: &Step) -> String {
    format!("  {:>2}. {:<10} {}", index + 1, step.kind(), step.name())
}

/// One line describing a Required value and the pattern it must match.
pub fn required_line(name: &str, pattern: Option<&Regex>) -> String {
    match pattern {
        Some(re) => format!("      {:<10} /{}/", name, re.as_str()),
        None => format!("      {:<10} any value", name),
    }
}

/// Print a diagnostic, styled by severity.
pub fn show_diagnostic(ui: &mut dyn UserInterface, diag: &LintDiagnostic) {
    let line = match &diag.step {
        Some(step) => format!("{} (step {})", diag, step),
        None => diag.to_string(),
    };
    match diag.severity {
        Severity::Error => ui.error(&line),
        Severity::Warning => ui.warning(&line),
        Severity::Hint => ui.message(&line),
    }
    if let Some(suggestion) = &diag.suggestion {
        ui.message(&format!("    help: {}", suggestion));
    }
}
