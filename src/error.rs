//! Error types for seqrun operations.
//!
//! This module defines [`SeqrunError`], the primary error type used throughout
//! the crate, the narrower taxonomies it wraps ([`ValidationError`],
//! [`LexError`], [`TemplateError`]) and a [`Result`] type alias.
//!
//! # Error Handling Strategy
//!
//! - Load and validation errors abort before any step executes
//! - Errors raised while a step runs are wrapped in [`SeqrunError::StepFailed`]
//!   so the caller knows which step to resume from
//! - Use `anyhow::Error` (via `SeqrunError::Other`) for unexpected errors

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for seqrun operations.
#[derive(Debug, Error)]
pub enum SeqrunError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A `Seqs` record did not decode into any step shape.
    #[error("Sequence({index}) does not decode into a CreateVar, Runner or WriteFile")]
    UnclassifiableStep { index: usize },

    /// Configuration or supplied values broke a validation rule.
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// The command line could not be tokenized.
    #[error("command could not be parsed: {0}")]
    Lex(#[from] LexError),

    /// A template failed to parse or render.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A command argument failed to render.
    #[error("arg({arg}): {source}")]
    Argument {
        arg: String,
        #[source]
        source: TemplateError,
    },

    /// A command line had no tokens at all.
    #[error("command must have at least the program name")]
    MissingProgram,

    /// The process could not be started.
    #[error("Could not start command {command}: {message}")]
    CommandSpawn { command: String, message: String },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Writing a file for a WriteFile step failed.
    #[error("WriteFile({path}): {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The resume target is not a step in the sequence.
    #[error("couldn't find the step to start at({name})")]
    ResumeTargetNotFound { name: String },

    /// A resume checkpoint could not be read or was invalid.
    #[error("Invalid resume file {path}: {message}")]
    InvalidCheckpoint { path: PathBuf, message: String },

    /// A step failed during execution.
    #[error("Step '{step}' failed: {source}")]
    StepFailed {
        step: String,
        #[source]
        source: Box<SeqrunError>,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SeqrunError {
    /// Name of the step that failed, if this error came out of a run.
    pub fn failed_step(&self) -> Option<&str> {
        match self {
            SeqrunError::StepFailed { step, .. } => Some(step),
            _ => None,
        }
    }
}

/// Rules a configuration or its supplied values can break.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("a Required field({name}) was set twice")]
    DuplicateRequiredName { name: String },

    #[error("a Required field({name}) had an invalid regex({pattern}): {message}")]
    InvalidPattern {
        name: String,
        pattern: String,
        message: String,
    },

    #[error("there are {required} values required, but saw {supplied} passed")]
    ValueCountMismatch { required: usize, supplied: usize },

    #[error("value passed with key({key}) that was not found in Required")]
    UnknownSuppliedKey { key: String },

    #[error("value passed with key({key}) did not have a valid value({value})")]
    PatternMismatch { key: String, value: String },

    #[error("{kind}({name}) was defined multiple times")]
    DuplicateStepName { kind: &'static str, name: String },

    #[error("{kind}({name}) cannot have an empty {field} field")]
    EmptyRequiredField {
        kind: &'static str,
        name: String,
        field: &'static str,
    },

    #[error("CreateVar({name}) cannot have key({key}): has leading or trailing space")]
    KeyHasWhitespace { name: String, key: String },

    #[error("Runner({name}) had a {setting} of {} which exceeds the 30 minute maximum", humantime::format_duration(*.duration))]
    TimeBudgetExceeded {
        name: String,
        setting: &'static str,
        duration: Duration,
    },

    #[error("Runner({name}) had a Retries setting of {retries}, which exceeds the 100 maximum or is less than 0")]
    RetriesOutOfRange { name: String, retries: i64 },

    #[error("no Sequence was defined as a Runner")]
    NoRunnerPresent,
}

/// Tokenizer diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("open quote({quote}) was never closed")]
    UnterminatedQuote { quote: char },

    #[error("open quote({quote}) was not met with a closed quote followed by a space or EOL")]
    QuoteNotAtBoundary { quote: char },
}

/// Template parse and render failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template({template}) violated a template rule: {message}")]
    Syntax { template: String, message: String },

    #[error("template({template}): problem with template execution: {message}")]
    Execution { template: String, message: String },
}

/// Result type alias for seqrun operations.
pub type Result<T> = std::result::Result<T, SeqrunError>;
