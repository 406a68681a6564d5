//! Configuration schema types.
//!
//! These types map directly to the YAML configuration document. Keys are
//! PascalCase:
//!
//! ```yaml
//! Required:
//!   - Name: Subscription
//!     Regex: "^[0-9a-f-]+$"
//!   - Name: Region
//! CreateVars:
//!   - Name: Create KubeName
//!     Key: KubeName
//!     Value: "kube_{{ .Region }}"
//! Seqs:
//!   - Name: CreateGroup
//!     Cmd: az group create --name {{.KubeName}} --location {{.Region}}
//!     Retries: 3
//!     RetrySleep: 10s
//!   - Name: Write Group
//!     Path: ./group.json
//!     Value: "{{ .Group }}"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration document.
///
/// `Seqs` is kept as raw YAML: each record is classified into a step shape
/// by the loader.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ConfigDocument {
    /// Values that must be supplied before anything runs.
    #[serde(default)]
    pub required: Vec<Required>,

    /// Variables derived while the config loads, before the sequence runs.
    #[serde(default)]
    pub create_vars: Vec<CreateVar>,

    /// Step records, in execution order.
    #[serde(default)]
    pub seqs: Vec<serde_yaml::Value>,
}

/// A value that must be passed in before anything is executed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Required {
    /// Name of the value that must be passed.
    pub name: String,

    /// Pattern the value must match. Unchecked when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

/// Derives a variable from a template and stores it in the value table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct CreateVar {
    /// Unique step name.
    #[serde(default)]
    pub name: String,

    /// Key to store the rendered value under.
    #[serde(default)]
    pub key: String,

    /// Template for the value.
    #[serde(default)]
    pub value: String,
}

/// Renders a template and writes it to a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct WriteFile {
    /// Unique step name.
    #[serde(default)]
    pub name: String,

    /// Where to write the file.
    #[serde(default)]
    pub path: String,

    /// Template for the file contents.
    #[serde(default)]
    pub value: String,
}

/// Runs an external program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Runner {
    /// Unique step name.
    #[serde(default)]
    pub name: String,

    /// Command line template. The program name is never rendered.
    #[serde(default)]
    pub cmd: String,

    /// Pause before the first attempt.
    #[serde(default, with = "humantime_serde")]
    pub sleep: Duration,

    /// Extra attempts after a non-zero exit.
    #[serde(default)]
    pub retries: i64,

    /// Pause between attempts.
    #[serde(default, with = "humantime_serde")]
    pub retry_sleep: Duration,

    /// Key to store the trimmed command output under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_key: Option<String>,
}

impl Runner {
    /// The output key, if one was set to a non-empty value.
    pub fn value_key(&self) -> Option<&str> {
        self.value_key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Explicit step tag accepted in a record's `Kind` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum StepKind {
    CreateVar,
    Runner,
    WriteFile,
}
