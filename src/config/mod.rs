//! Configuration loading, parsing, and validation.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - Loading and step classification in [`loader`]
//! - Validation rules in [`validator`]
//! - Template rendering in [`template`]
//! - The value table in [`values`]
//!
//! # Example
//!
//! ```
//! use seqrun::config::{parse_config, ValueTable};
//! use std::path::Path;
//!
//! let yaml = r#"
//! Required:
//!   - Name: Region
//! CreateVars:
//!   - Name: Make KubeName
//!     Key: KubeName
//!     Value: "kube_{{ .Region }}"
//! Seqs:
//!   - Name: Echo
//!     Cmd: echo {{.KubeName}}
//! "#;
//!
//! let mut vals: ValueTable = [("Region", "westus2")].into_iter().collect();
//! let config = parse_config(yaml, Path::new("seq.yml"), &mut vals).unwrap();
//! assert_eq!(config.steps().len(), 1);
//! assert_eq!(vals.get("KubeName"), Some("kube_westus2"));
//! ```

pub mod loader;
pub mod schema;
pub mod template;
pub mod validator;
pub mod values;

// Schema re-exports
pub use schema::{ConfigDocument, CreateVar, Required, Runner, StepKind, WriteFile};

// Loader re-exports
pub use loader::{classify_step, load_config, parse_config, Config};

// Validator re-exports
pub use validator::{
    normalize_command, validate_sequence, RequiredIndex, StepNames, MAX_RETRIES, MAX_STEP_WAIT,
};

// Template re-exports
pub use template::{parse_template, referenced_keys, render, Segment};

pub use values::ValueTable;
