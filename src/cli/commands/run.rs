//! Run command implementation.
//!
//! The `seqrun run` command loads the sequence file and executes it. When a
//! step fails, the value table and the failing step's name are written to a
//! resume file so `seqrun run --resume <file>` can pick up where it stopped.

use std::path::{Path, PathBuf};

use crate::cli::args::RunArgs;
use crate::config::load_config;
use crate::error::Result;
use crate::fs::OsFileSystem;
use crate::runner::{Executor, RunProgress};
use crate::shell::{CommandOptions, SystemProcessRunner};
use crate::state::ResumeCheckpoint;
use crate::ui::{format_duration, OutputMode, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::display::parse_vals;

/// The run command implementation.
pub struct RunCommand {
    config_path: PathBuf,
    vals: Option<String>,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(config_path: &Path, vals: Option<String>, args: RunArgs) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
            vals,
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    fn show_progress(ui: &mut dyn UserInterface, progress: RunProgress<'_>) {
        let quiet = ui.output_mode() == OutputMode::Quiet;
        match progress {
            RunProgress::StepStarting { name, index, total } => {
                ui.show_step(index + 1, total, name);
            }
            RunProgress::Sleeping { name, duration } => {
                if !quiet {
                    ui.message(&format!(
                        "  sleeping {} before {}",
                        humantime::format_duration(duration),
                        name
                    ));
                }
            }
            RunProgress::AttemptFailed {
                attempt,
                attempts,
                output,
                error,
                ..
            } => {
                ui.warning(&format!("  attempt {}/{} failed: {}", attempt, attempts, error));
                // Echoed output was already shown as it arrived.
                if quiet && !output.is_empty() {
                    ui.show_output(output);
                }
            }
            RunProgress::Retrying { delay, .. } => {
                if !quiet {
                    ui.message(&format!(
                        "  retrying in {}",
                        humantime::format_duration(delay)
                    ));
                }
            }
            RunProgress::StepFinished { name, duration } => {
                if !quiet {
                    ui.success(&format!("  {} ({})", name, format_duration(duration)));
                }
            }
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let fs = OsFileSystem;
        let mut vals = parse_vals(self.vals.as_deref())?;
        let config = load_config(&fs, &self.config_path, &mut vals)?;

        let mut start_at = None;
        if let Some(path) = &self.args.resume {
            let checkpoint = ResumeCheckpoint::load(&fs, path)?;
            if !checkpoint.vals.is_empty() {
                vals = checkpoint.vals;
            }
            ui.message(&format!("Resuming at {}", checkpoint.start_at));
            start_at = Some(checkpoint.start_at);
        }

        ui.show_header(&format!("Running {}", self.config_path.display()));

        let options = CommandOptions {
            echo_output: ui.output_mode().shows_command_output(),
            ..CommandOptions::default()
        };
        let runner = SystemProcessRunner;
        let mut executor = Executor::new(config.steps(), &fs, &runner).with_command_options(options);
        if let Some(name) = start_at {
            executor = executor.start_at(name);
        }

        let result =
            executor.run_with_progress(&mut vals, |progress| Self::show_progress(ui, progress));

        match result {
            Ok(summary) => {
                ui.success(&format!(
                    "program ended successfully ({} steps in {})",
                    summary.executed.len(),
                    format_duration(summary.duration)
                ));
                Ok(CommandResult::success())
            }
            Err(e) => {
                ui.error(&format!("The program had a problem: {}", e));

                // Nothing ran if the resume target was missing.
                let Some(failed) = executor.failed_step() else {
                    return Ok(CommandResult::failure(1));
                };

                let path = self
                    .args
                    .resume
                    .clone()
                    .unwrap_or_else(ResumeCheckpoint::default_path);
                ResumeCheckpoint::new(vals, failed).save(&fs, &path)?;

                let id = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                ui.message(&format!("your resume file ID is: {}", id));
                ui.message(&format!("resume with: seqrun run --resume {}", path.display()));
                Ok(CommandResult::failure(1))
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::SeqrunError;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn setup(config: &str) -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("seqrun.yml");
        fs::write(&path, config).unwrap();
        (temp, path)
    }

    #[test]
    fn runs_sequence_and_writes_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("seqrun.yml");
        let config = format!(
            r#"
Required:
  - Name: Region
CreateVars:
  - Name: Make KubeName
    Key: KubeName
    Value: "kube_{{{{ .Region }}}}"
Seqs:
  - Name: Echo
    Cmd: echo {{{{.KubeName}}}}
    ValueKey: Echoed
  - Name: Save
    Path: {}
    Value: "{{{{ .Echoed }}}}"
"#,
            temp.path().join("out.txt").display()
        );
        fs::write(&path, config).unwrap();

        let cmd = RunCommand::new(
            &path,
            Some(r#"{"Region": "westus2"}"#.to_string()),
            RunArgs::default(),
        );
        let mut ui = MockUI::with_mode(OutputMode::Quiet);
        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_success("program ended successfully"));
        assert_eq!(ui.steps().len(), 2);
        assert_eq!(
            fs::read_to_string(temp.path().join("out.txt")).unwrap(),
            "kube_westus2"
        );
    }

    #[test]
    fn failure_writes_resume_file() {
        let (temp, path) = setup(
            r#"
Required:
  - Name: Region
Seqs:
  - Name: Ok
    Cmd: "true"
  - Name: Broken
    Cmd: "false"
"#,
        );
        let resume = temp.path().join("run.resume.json");

        let cmd = RunCommand::new(
            &path,
            Some(r#"{"Region": "west"}"#.to_string()),
            RunArgs {
                resume: None,
            },
        );
        let mut ui = MockUI::with_mode(OutputMode::Quiet);
        let result = cmd.execute(&mut ui).unwrap();
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("The program had a problem"));
        let id = ui
            .messages()
            .iter()
            .find_map(|m| m.strip_prefix("your resume file ID is: "))
            .unwrap()
            .to_string();
        let default_file = std::env::temp_dir().join(&id);
        assert!(id.ends_with(".resume.json"));
        assert!(default_file.exists());
        fs::remove_file(default_file).unwrap();
        assert!(!resume.exists());

        // A second run resuming from a hand-written file overwrites it.
        fs::write(&resume, r#"{"Vals": {"Region": "east"}, "StartAt": "Broken"}"#).unwrap();
        let cmd = RunCommand::new(
            &path,
            Some(r#"{"Region": "west"}"#.to_string()),
            RunArgs {
                resume: Some(resume.clone()),
            },
        );
        let mut ui = MockUI::with_mode(OutputMode::Quiet);
        let result = cmd.execute(&mut ui).unwrap();
        assert_eq!(result.exit_code, 1);
        assert_eq!(ui.steps(), &[(2, 2, "Broken".to_string())]);
        assert!(ui.has_message("your resume file ID is: run.resume.json"));

        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&resume).unwrap()).unwrap();
        assert_eq!(saved["StartAt"], "Broken");
        assert_eq!(saved["Vals"]["Region"], "east");
    }

    #[test]
    fn unknown_resume_target_writes_nothing() {
        let (temp, path) = setup(
            r#"
Seqs:
  - Name: Only
    Cmd: "true"
"#,
        );
        let resume = temp.path().join("r.json");
        let original = r#"{"Vals": {}, "StartAt": "Missing"}"#;
        fs::write(&resume, original).unwrap();

        let cmd = RunCommand::new(
            &path,
            None,
            RunArgs {
                resume: Some(resume.clone()),
            },
        );
        let mut ui = MockUI::with_mode(OutputMode::Quiet);
        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("couldn't find the step to start at(Missing)"));
        assert_eq!(fs::read_to_string(&resume).unwrap(), original);
    }

    #[test]
    fn missing_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let cmd = RunCommand::new(&temp.path().join("nope.yml"), None, RunArgs::default());
        let mut ui = MockUI::new();
        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, SeqrunError::ConfigNotFound { .. }));
    }

    #[test]
    fn missing_required_value_fails_before_running() {
        let (_temp, path) = setup(
            r#"
Required:
  - Name: Region
Seqs:
  - Name: Only
    Cmd: "true"
"#,
        );
        let cmd = RunCommand::new(&path, None, RunArgs::default());
        let mut ui = MockUI::new();
        assert!(cmd.execute(&mut ui).is_err());
        assert!(ui.steps().is_empty());
    }
}
