//! seqrun - declarative step sequences with retries and resume.
//!
//! A sequence file lists `Required` input values, `CreateVars` derived from
//! them at load time, and `Seqs`: an ordered list of steps. Each step either
//! stores a rendered value (`CreateVar`), writes a rendered file
//! (`WriteFile`) or runs a program (`Runner`). When a step fails, the run
//! stops and a resume file records where to start again.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Loading, classification, validation and templates
//! - [`error`] - Error types and result aliases
//! - [`fs`] - File system seam used by loading and WriteFile steps
//! - [`lint`] - Lint rules and JSON Schema for sequence files
//! - [`runner`] - Sequential execution with retries
//! - [`shell`] - Command line lexing and process invocation
//! - [`state`] - Resume checkpoints
//! - [`steps`] - The step model
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```no_run
//! use seqrun::config::{parse_config, ValueTable};
//! use seqrun::fs::MemoryFileSystem;
//! use seqrun::runner::Executor;
//! use seqrun::shell::SystemProcessRunner;
//! use std::path::Path;
//!
//! let yaml = r#"
//! Required:
//!   - Name: Region
//! Seqs:
//!   - Name: Lookup
//!     Cmd: echo {{.Region}}
//!     ValueKey: Found
//!   - Name: Write region
//!     Path: region.txt
//!     Value: "{{ .Found }}"
//! "#;
//!
//! let mut vals: ValueTable = [("Region", "westus2")].into_iter().collect();
//! let config = parse_config(yaml, Path::new("seqrun.yml"), &mut vals)?;
//!
//! let fs = MemoryFileSystem::new();
//! Executor::new(config.steps(), &fs, &SystemProcessRunner).run(&mut vals)?;
//! assert_eq!(fs.contents("region.txt").unwrap(), b"westus2");
//! # Ok::<(), seqrun::SeqrunError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod lint;
pub mod runner;
pub mod shell;
pub mod state;
pub mod steps;
pub mod ui;

pub use error::{Result, SeqrunError};
