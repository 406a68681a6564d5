//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Running with no subcommand is
//! the same as `seqrun run`.

pub mod check;
pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod run;
pub mod schema;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
