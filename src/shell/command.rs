//! Process invocation.
//!
//! Programs are started directly from an argument vector, never through a
//! shell, with a cleared environment holding only [`base_env`] plus any
//! explicit entries.

use crate::error::{Result, SeqrunError};
use crate::shell::args::CommandLine;
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Variables copied from the parent environment when set.
pub const BASE_ENV_VARS: &[&str] = &["HOME", "PATH", "GOPATH", "CARGO_HOME"];

/// Result of one process invocation.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Stdout and stderr interleaved in arrival order.
    pub output: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(output: impl Into<String>, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            output: output.into(),
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, output: impl Into<String>, duration: Duration) -> Self {
        Self {
            exit_code,
            output: output.into(),
            duration,
            success: false,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Entries added on top of the base environment.
    pub env: BTreeMap<String, String>,

    /// Print each output line as it arrives.
    pub echo_output: bool,
}

/// Output line from command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Starts external programs.
pub trait ProcessRunner {
    /// Run `command` to completion.
    ///
    /// A non-zero exit is a result with `success == false`, not an error.
    fn invoke(&self, command: &CommandLine, options: &CommandOptions) -> Result<CommandResult>;
}

/// Runs programs on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn invoke(&self, command: &CommandLine, options: &CommandOptions) -> Result<CommandResult> {
        let start = Instant::now();
        let spawn_error = |message: String| SeqrunError::CommandSpawn {
            command: command.to_string(),
            message,
        };

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .env_clear()
            .envs(base_env())
            .envs(&options.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| spawn_error(e.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| spawn_error("stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| spawn_error("stderr was not captured".to_string()))?;

        let (tx, rx) = mpsc::channel();
        let stdout_handle = spawn_reader(stdout, tx.clone(), OutputLine::Stdout);
        let stderr_handle = spawn_reader(stderr, tx, OutputLine::Stderr);

        let mut output = String::new();
        for line in rx {
            let text = match &line {
                OutputLine::Stdout(s) => {
                    if options.echo_output {
                        println!("{}", s);
                    }
                    s
                }
                OutputLine::Stderr(s) => {
                    if options.echo_output {
                        eprintln!("{}", s);
                    }
                    s
                }
            };
            output.push_str(text);
            output.push('\n');
        }

        let _ = stdout_handle.join();
        let _ = stderr_handle.join();

        let status = child.wait().map_err(|e| spawn_error(e.to_string()))?;
        let duration = start.elapsed();

        tracing::debug!(
            "{} exited with {:?} after {:?}",
            command.program,
            status.code(),
            duration
        );

        if status.success() {
            Ok(CommandResult::success(output, duration))
        } else {
            Ok(CommandResult::failure(status.code(), output, duration))
        }
    }
}

/// Forward `pipe` line by line until EOF. Lines that are not UTF-8 are
/// converted lossily; the pipe is always drained so the child never sees
/// a closed reader.
fn spawn_reader<R, F>(pipe: R, tx: mpsc::Sender<OutputLine>, wrap: F) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
    F: Fn(String) -> OutputLine + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    if buf.last() == Some(&b'\n') {
                        buf.pop();
                        if buf.last() == Some(&b'\r') {
                            buf.pop();
                        }
                    }
                    let _ = tx.send(wrap(String::from_utf8_lossy(&buf).into_owned()));
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!("Stopped reading child output: {}", e);
                    break;
                }
            }
        }
    })
}

/// The base environment for child processes.
pub fn base_env() -> Vec<(String, String)> {
    BASE_ENV_VARS
        .iter()
        .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
        .collect()
}
