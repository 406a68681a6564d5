//! Sequence execution.
//!
//! [`Executor`] walks a validated step sequence in order, threading one
//! value table through every step. A failure stops the run and records the
//! failing step's name so the run can be resumed from it.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::schema::Runner;
use crate::config::validator::MAX_RETRIES;
use crate::config::values::ValueTable;
use crate::error::{Result, SeqrunError};
use crate::fs::FileSystem;
use crate::shell::{CommandLine, CommandOptions, ProcessRunner};
use crate::steps::Step;

/// Progress events emitted during a run.
#[derive(Debug)]
pub enum RunProgress<'a> {
    /// A step is about to start. `index` is its position in the sequence.
    StepStarting {
        name: &'a str,
        index: usize,
        total: usize,
    },
    /// A Runner is pausing before its first attempt.
    Sleeping { name: &'a str, duration: Duration },
    /// A Runner attempt failed.
    AttemptFailed {
        name: &'a str,
        attempt: u32,
        attempts: u32,
        output: &'a str,
        error: &'a SeqrunError,
    },
    /// A Runner is about to pause and try again.
    Retrying {
        name: &'a str,
        attempt: u32,
        attempts: u32,
        delay: Duration,
    },
    /// A step finished successfully.
    StepFinished { name: &'a str, duration: Duration },
}

/// Summary of a successful run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Names of the steps that ran, in order.
    pub executed: Vec<String>,
    /// Total duration.
    pub duration: Duration,
}

/// Blocks the current thread.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps with [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Runs a step sequence against a value table.
///
/// # Example
///
/// ```no_run
/// use seqrun::config::{load_config, ValueTable};
/// use seqrun::fs::OsFileSystem;
/// use seqrun::runner::Executor;
/// use seqrun::shell::SystemProcessRunner;
/// use std::path::Path;
///
/// let mut vals: ValueTable = [("Region", "westus2")].into_iter().collect();
/// let config = load_config(&OsFileSystem, Path::new("seq.yml"), &mut vals)?;
///
/// let mut executor = Executor::new(config.steps(), &OsFileSystem, &SystemProcessRunner);
/// if let Err(e) = executor.run(&mut vals) {
///     eprintln!("failed at {:?}: {}", executor.failed_step(), e);
/// }
/// # Ok::<(), seqrun::SeqrunError>(())
/// ```
pub struct Executor<'a> {
    steps: &'a [Step],
    fs: &'a dyn FileSystem,
    runner: &'a dyn ProcessRunner,
    sleeper: &'a dyn Sleeper,
    options: CommandOptions,
    start_at: Option<String>,
    failed_step: Option<String>,
}

impl<'a> Executor<'a> {
    /// Create an executor that starts at the first step.
    pub fn new(steps: &'a [Step], fs: &'a dyn FileSystem, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            steps,
            fs,
            runner,
            sleeper: &ThreadSleeper,
            options: CommandOptions::default(),
            start_at: None,
            failed_step: None,
        }
    }

    /// Start at the step with this name instead of the first.
    pub fn start_at(mut self, name: impl Into<String>) -> Self {
        self.start_at = Some(name.into());
        self
    }

    pub fn with_sleeper(mut self, sleeper: &'a dyn Sleeper) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Options passed to every process invocation.
    pub fn with_command_options(mut self, options: CommandOptions) -> Self {
        self.options = options;
        self
    }

    /// Name of the step that failed in the last run, if any.
    pub fn failed_step(&self) -> Option<&str> {
        self.failed_step.as_deref()
    }

    /// Run the sequence.
    pub fn run(&mut self, vals: &mut ValueTable) -> Result<RunSummary> {
        self.run_with_progress(vals, |_| {})
    }

    /// Run the sequence with a progress callback.
    ///
    /// # Errors
    ///
    /// Returns `ResumeTargetNotFound` before anything runs if the start step
    /// does not exist. A failing step is returned as `StepFailed`; the value
    /// table keeps every change made before it.
    pub fn run_with_progress(
        &mut self,
        vals: &mut ValueTable,
        mut on_progress: impl FnMut(RunProgress<'_>),
    ) -> Result<RunSummary> {
        self.failed_step = None;
        let start = Instant::now();
        let first = self.start_index()?;
        let steps = self.steps;
        let total = steps.len();
        let mut executed = Vec::with_capacity(total - first);

        for (index, step) in steps.iter().enumerate().skip(first) {
            let name = step.name();
            on_progress(RunProgress::StepStarting { name, index, total });
            debug!("Starting {}({})", step.kind(), name);

            let step_start = Instant::now();
            let outcome = match step {
                Step::CreateVar(var) => var.apply(vals).map_err(SeqrunError::from),
                Step::WriteFile(file) => file.apply(self.fs, vals),
                Step::Runner(runner) => self.run_runner(runner, vals, &mut on_progress),
            };

            if let Err(e) = outcome {
                warn!("{}({}) failed: {}", step.kind(), name, e);
                self.failed_step = Some(name.to_string());
                return Err(SeqrunError::StepFailed {
                    step: name.to_string(),
                    source: Box::new(e),
                });
            }

            on_progress(RunProgress::StepFinished {
                name,
                duration: step_start.elapsed(),
            });
            executed.push(name.to_string());
        }

        Ok(RunSummary {
            executed,
            duration: start.elapsed(),
        })
    }

    fn start_index(&self) -> Result<usize> {
        match &self.start_at {
            None => Ok(0),
            Some(name) => self
                .steps
                .iter()
                .position(|s| s.name() == name)
                .ok_or_else(|| SeqrunError::ResumeTargetNotFound { name: name.clone() }),
        }
    }

    fn run_runner(
        &self,
        runner: &Runner,
        vals: &mut ValueTable,
        on_progress: &mut impl FnMut(RunProgress<'_>),
    ) -> Result<()> {
        let name = runner.name.as_str();
        let attempts = runner.retries.clamp(0, MAX_RETRIES) as u32 + 1;
        let mut command = CommandLine::build(&runner.cmd, vals)?;

        if !runner.sleep.is_zero() {
            on_progress(RunProgress::Sleeping {
                name,
                duration: runner.sleep,
            });
            info!(
                "Runner({}) sleeping {}",
                name,
                humantime::format_duration(runner.sleep)
            );
            self.sleeper.sleep(runner.sleep);
        }

        let mut attempt = 1;
        loop {
            debug!("Runner({}) attempt {}/{}: {}", name, attempt, attempts, command);

            let error = match self.runner.invoke(&command, &self.options) {
                Ok(result) if result.success => {
                    if let Some(key) = runner.value_key() {
                        vals.insert(key, result.output.trim());
                    }
                    return Ok(());
                }
                Ok(result) => {
                    let error = SeqrunError::CommandFailed {
                        command: command.to_string(),
                        code: result.exit_code,
                    };
                    on_progress(RunProgress::AttemptFailed {
                        name,
                        attempt,
                        attempts,
                        output: &result.output,
                        error: &error,
                    });
                    error
                }
                Err(error) => {
                    on_progress(RunProgress::AttemptFailed {
                        name,
                        attempt,
                        attempts,
                        output: "",
                        error: &error,
                    });
                    error
                }
            };

            if attempt >= attempts {
                return Err(error);
            }

            warn!(
                "Runner({}) attempt {}/{} failed: {}",
                name, attempt, attempts, error
            );
            on_progress(RunProgress::Retrying {
                name,
                attempt: attempt + 1,
                attempts,
                delay: runner.retry_sleep,
            });
            self.sleeper.sleep(runner.retry_sleep);

            attempt += 1;
            command = CommandLine::build(&runner.cmd, vals)?;
        }
    }
}
