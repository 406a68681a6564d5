//! Check command implementation.
//!
//! The `seqrun check` command loads the sequence file the same way `run`
//! does, lists its steps and runs the lint rules over it. Nothing executes.

use std::path::{Path, PathBuf};

use crate::cli::args::CheckArgs;
use crate::config::load_config;
use crate::error::Result;
use crate::fs::OsFileSystem;
use crate::lint::{RuleRegistry, Severity};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display::{parse_vals, required_line, show_diagnostic, step_line};

/// The check command implementation.
pub struct CheckCommand {
    config_path: PathBuf,
    vals: Option<String>,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(config_path: &Path, vals: Option<String>, args: CheckArgs) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
            vals,
            args,
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut vals = parse_vals(self.vals.as_deref())?;
        let config = load_config(&OsFileSystem, &self.config_path, &mut vals)?;

        ui.show_header(&format!("Checking {}", self.config_path.display()));
        let required = config.required_index();
        if !required.is_empty() {
            ui.message(&format!("Required values ({}):", required.len()));
            for req in &config.required {
                ui.message(&required_line(&req.name, required.pattern(&req.name)));
            }
        }
        ui.message(&format!("Steps ({}):", config.steps().len()));
        for (index, step) in config.steps().iter().enumerate() {
            ui.message(&step_line(index, step));
        }

        let diagnostics = RuleRegistry::with_builtins().check(&config);
        for diag in &diagnostics {
            show_diagnostic(ui, diag);
        }

        let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
        let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);
        if has_errors || (self.args.strict && has_warnings) {
            return Ok(CommandResult::failure(1));
        }

        ui.success(&format!(
            "Configuration is valid ({} steps)",
            config.steps().len()
        ));
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn setup(config: &str) -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("seqrun.yml");
        fs::write(&path, config).unwrap();
        (temp, path)
    }

    const WITH_UNDEFINED_KEY: &str = r#"
Seqs:
  - Name: Echo
    Cmd: echo {{.Missing}}
"#;

    #[test]
    fn valid_config_lists_steps() {
        let (_temp, path) = setup(
            r#"
Required:
  - Name: Region
    Regex: "^[a-z]+$"
  - Name: Owner
Seqs:
  - Name: Set
    Key: Zone
    Value: "{{ .Region }}-1"
  - Name: Echo
    Cmd: echo {{.Zone}}
"#,
        );
        let cmd = CheckCommand::new(&path, Some(r#"{"Region":"west","Owner":"ops"}"#.to_string()), CheckArgs::default());
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("Required values (2):"));
        assert!(ui.has_message("      Region     /^[a-z]+$/"));
        assert!(ui.has_message("      Owner      any value"));
        assert!(ui.has_message("CreateVar"));
        assert!(ui.has_message("Echo"));
        assert!(ui.has_success("Configuration is valid (2 steps)"));
    }

    #[test]
    fn warnings_pass_unless_strict() {
        let (_temp, path) = setup(WITH_UNDEFINED_KEY);

        let mut ui = MockUI::new();
        let result = CheckCommand::new(&path, None, CheckArgs::default())
            .execute(&mut ui)
            .unwrap();
        assert!(result.success);
        assert!(ui.has_warning("Missing"));

        let mut ui = MockUI::new();
        let result = CheckCommand::new(&path, None, CheckArgs { strict: true })
            .execute(&mut ui)
            .unwrap();
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn load_errors_propagate() {
        let (_temp, path) = setup("Seqs:\n  - Name: Nothing\n");
        let mut ui = MockUI::new();
        assert!(CheckCommand::new(&path, None, CheckArgs::default())
            .execute(&mut ui)
            .is_err());
    }
}
