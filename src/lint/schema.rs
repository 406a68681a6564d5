//! JSON Schema generation for seqrun configuration.
//!
//! This module generates a JSON Schema (Draft-07) for the configuration
//! document, enabling editor autocomplete and validation.

use serde_json::{json, Value};

use crate::config::validator::{MAX_RETRIES, MAX_STEP_WAIT};

/// Generates JSON Schema for seqrun configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaGenerator;

impl SchemaGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate the complete JSON Schema for a sequence file.
    pub fn generate(&self) -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "seqrun configuration",
            "description": "An ordered sequence of CreateVar, WriteFile and Runner steps",
            "type": "object",
            "properties": {
                "Required": {
                    "type": "array",
                    "description": "Values that must be passed with --vals",
                    "items": self.required_schema()
                },
                "CreateVars": {
                    "type": "array",
                    "description": "Variables derived while the file loads",
                    "items": self.create_var_schema()
                },
                "Seqs": {
                    "type": "array",
                    "description": "Steps, run in order",
                    "items": {
                        "oneOf": [
                            self.create_var_schema(),
                            self.write_file_schema(),
                            self.runner_schema()
                        ]
                    }
                }
            },
            "additionalProperties": false
        })
    }

    fn required_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "Name": { "type": "string" },
                "Regex": {
                    "type": "string",
                    "format": "regex",
                    "description": "Pattern the supplied value must match"
                }
            },
            "required": ["Name"],
            "additionalProperties": false
        })
    }

    fn create_var_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "Kind": { "const": "CreateVar" },
                "Name": { "type": "string", "minLength": 1 },
                "Key": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Key to store the rendered value under"
                },
                "Value": { "type": "string", "description": "Template, e.g. kube_{{ .Region }}" }
            },
            "required": ["Name", "Key"],
            "additionalProperties": false
        })
    }

    fn write_file_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "Kind": { "const": "WriteFile" },
                "Name": { "type": "string", "minLength": 1 },
                "Path": { "type": "string", "minLength": 1 },
                "Value": { "type": "string", "minLength": 1 }
            },
            "required": ["Name", "Path", "Value"],
            "additionalProperties": false
        })
    }

    fn runner_schema(&self) -> Value {
        let max_wait = humantime::format_duration(MAX_STEP_WAIT).to_string();
        json!({
            "type": "object",
            "properties": {
                "Kind": { "const": "Runner" },
                "Name": { "type": "string", "minLength": 1 },
                "Cmd": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Command line; every argument after the program is a template"
                },
                "Sleep": {
                    "type": "string",
                    "description": format!("Pause before the first attempt, at most {}", max_wait)
                },
                "Retries": {
                    "type": "integer",
                    "minimum": 0,
                    "maximum": MAX_RETRIES
                },
                "RetrySleep": {
                    "type": "string",
                    "description": format!("Pause between attempts; Retries x RetrySleep at most {}", max_wait)
                },
                "ValueKey": {
                    "type": "string",
                    "description": "Store the trimmed output under this key"
                }
            },
            "required": ["Name", "Cmd"],
            "additionalProperties": false
        })
    }
}
