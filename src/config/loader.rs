//! Configuration loading.
//!
//! Turns a YAML document plus the supplied values into a validated
//! [`Config`]. Loading runs the `CreateVars` block, so the value table is
//! mutated along the way. Any error aborts the whole load.

use crate::config::schema::{ConfigDocument, CreateVar, Required, Runner, StepKind, WriteFile};
use crate::config::validator::{validate_create_var, validate_sequence, RequiredIndex, StepNames};
use crate::config::values::ValueTable;
use crate::error::{Result, SeqrunError};
use crate::fs::FileSystem;
use crate::steps::Step;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::path::Path;

/// A validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Values that had to be supplied.
    pub required: Vec<Required>,

    /// The eagerly executed variable block, as validated.
    pub create_vars: Vec<CreateVar>,

    /// Steps in execution order.
    pub sequence: Vec<Step>,

    required_index: RequiredIndex,
}

impl Config {
    pub fn steps(&self) -> &[Step] {
        &self.sequence
    }

    /// Required names mapped to their compiled patterns.
    pub fn required_index(&self) -> &RequiredIndex {
        &self.required_index
    }
}

/// Load and validate the config file at `path`.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist, `ConfigParseError`
/// if it is not a valid document, and validation errors otherwise.
pub fn load_config(fs: &dyn FileSystem, path: &Path, vals: &mut ValueTable) -> Result<Config> {
    let content = fs.read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SeqrunError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SeqrunError::Io(e)
        }
    })?;

    parse_config(&content, path, vals)
}

/// Parse and validate YAML content.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
/// * `vals` - Supplied values; the `CreateVars` block writes into it
pub fn parse_config(content: &str, source_path: &Path, vals: &mut ValueTable) -> Result<Config> {
    let doc: ConfigDocument =
        serde_yaml::from_str(content).map_err(|e| SeqrunError::ConfigParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut sequence = doc
        .seqs
        .into_iter()
        .enumerate()
        .map(|(index, record)| classify_step(index, record, source_path))
        .collect::<Result<Vec<_>>>()?;

    let required_index = RequiredIndex::build(&doc.required)?;
    required_index.check_values(vals)?;

    let mut names = StepNames::new();
    let mut create_vars = doc.create_vars;
    for var in &mut create_vars {
        validate_create_var(var, &mut names)?;
        var.apply(vals)?;
    }

    validate_sequence(&mut sequence, &mut names)?;

    tracing::debug!(
        "Loaded {}: {} required, {} vars, {} steps",
        source_path.display(),
        doc.required.len(),
        create_vars.len(),
        sequence.len()
    );

    Ok(Config {
        required: doc.required,
        create_vars,
        sequence,
        required_index,
    })
}

/// Decide which step shape a raw `Seqs` record is.
///
/// A `Kind` tag names the shape directly. Otherwise each shape is tried in
/// turn and accepted only when its distinguishing field (`Key`, `Cmd` or
/// `Path`) came out non-empty.
pub fn classify_step(index: usize, mut record: Value, source_path: &Path) -> Result<Step> {
    let tag = record.as_mapping_mut().and_then(|m| m.remove("Kind"));
    if let Some(tag) = tag {
        let kind: StepKind =
            serde_yaml::from_value(tag).map_err(|_| SeqrunError::UnclassifiableStep { index })?;
        return decode_tagged(index, kind, record, source_path);
    }

    if let Some(var) = try_shape::<CreateVar>(&record).filter(|v| !v.key.is_empty()) {
        return Ok(Step::CreateVar(var));
    }
    if let Some(runner) = try_shape::<Runner>(&record).filter(|r| !r.cmd.is_empty()) {
        return Ok(Step::Runner(runner));
    }
    if let Some(file) = try_shape::<WriteFile>(&record).filter(|w| !w.path.is_empty()) {
        return Ok(Step::WriteFile(file));
    }

    tracing::debug!("Sequence({}) matched no step shape", index);
    Err(SeqrunError::UnclassifiableStep { index })
}

fn try_shape<T: DeserializeOwned>(record: &Value) -> Option<T> {
    serde_yaml::from_value(record.clone()).ok()
}

fn decode_tagged(index: usize, kind: StepKind, record: Value, source_path: &Path) -> Result<Step> {
    let parse_error = |e: serde_yaml::Error| SeqrunError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: format!("Sequence({}): {}", index, e),
    };

    Ok(match kind {
        StepKind::CreateVar => Step::CreateVar(serde_yaml::from_value(record).map_err(parse_error)?),
        StepKind::Runner => Step::Runner(serde_yaml::from_value(record).map_err(parse_error)?),
        StepKind::WriteFile => Step::WriteFile(serde_yaml::from_value(record).map_err(parse_error)?),
    })
}
