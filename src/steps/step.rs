//! The step model.
//!
//! A sequence is a list of [`Step`]s. Each variant wraps the schema type it
//! was decoded from; validation and application dispatch by `match`.

use crate::config::schema::{CreateVar, Runner, WriteFile};
use crate::config::template::render;
use crate::config::validator::{
    validate_create_var, validate_runner, validate_write_file, StepNames,
};
use crate::config::values::ValueTable;
use crate::error::{Result, SeqrunError, TemplateError, ValidationError};
use crate::fs::{FileSystem, WRITE_FILE_MODE};
use crate::shell::Lexer;
use std::path::Path;

/// One unit of a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Store a rendered value in the table.
    CreateVar(CreateVar),
    /// Write a rendered value to a file.
    WriteFile(WriteFile),
    /// Run an external program.
    Runner(Runner),
}

impl Step {
    /// The step's unique name, used as the resume identifier.
    pub fn name(&self) -> &str {
        match self {
            Step::CreateVar(v) => &v.name,
            Step::WriteFile(w) => &w.name,
            Step::Runner(r) => &r.name,
        }
    }

    /// Display name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Step::CreateVar(_) => "CreateVar",
            Step::WriteFile(_) => "WriteFile",
            Step::Runner(_) => "Runner",
        }
    }

    pub fn is_runner(&self) -> bool {
        matches!(self, Step::Runner(_))
    }

    /// Templates this step renders, in the order it renders them.
    pub fn templates(&self) -> Vec<String> {
        match self {
            Step::CreateVar(v) => vec![v.value.clone()],
            Step::WriteFile(w) => vec![w.value.clone()],
            // The program name is never rendered.
            Step::Runner(r) => Lexer::new(&r.cmd)
                .skip(1)
                .filter_map(|t| t.value().map(str::to_string))
                .collect(),
        }
    }

    /// Key this step stores into the value table, if any.
    pub fn output_key(&self) -> Option<&str> {
        match self {
            Step::CreateVar(v) => Some(&v.key),
            Step::WriteFile(_) => None,
            Step::Runner(r) => r.value_key(),
        }
    }

    /// Validate the step and claim its name.
    pub fn validate(&mut self, names: &mut StepNames) -> std::result::Result<(), ValidationError> {
        match self {
            Step::CreateVar(v) => validate_create_var(v, names),
            Step::WriteFile(w) => validate_write_file(w, names),
            Step::Runner(r) => validate_runner(r, names),
        }
    }
}

impl CreateVar {
    /// Render the value and store it at `key`, replacing any previous value.
    pub fn apply(&self, vals: &mut ValueTable) -> std::result::Result<(), TemplateError> {
        let value = render(&self.value, vals)?;
        tracing::debug!("CreateVar({}) set {}", self.name, self.key);
        vals.insert(self.key.clone(), value);
        Ok(())
    }
}

impl WriteFile {
    /// Render the value and write it to `path`, readable by the owner only.
    pub fn apply(&self, fs: &dyn FileSystem, vals: &ValueTable) -> Result<()> {
        let contents = render(&self.value, vals)?;
        let path = Path::new(&self.path);
        fs.write_file(path, contents.as_bytes(), WRITE_FILE_MODE)
            .map_err(|source| SeqrunError::WriteFailed {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!("WriteFile({}) wrote {} bytes", self.path, contents.len());
        Ok(())
    }
}
