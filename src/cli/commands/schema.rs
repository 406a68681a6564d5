//! Schema command implementation.
//!
//! The `seqrun schema` command prints the JSON Schema for sequence files so
//! editors can validate and autocomplete them.

use crate::error::Result;
use crate::lint::SchemaGenerator;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The schema command implementation.
pub struct SchemaCommand;

impl Command for SchemaCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let schema = SchemaGenerator::new().generate();
        let json = serde_json::to_string_pretty(&schema).map_err(anyhow::Error::from)?;
        ui.message(&json);
        Ok(CommandResult::success())
    }
}
