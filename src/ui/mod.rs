//! Terminal user interface.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for terminal usage
//! - [`MockUI`] for capturing output in tests
//!
//! # Example
//!
//! ```
//! use seqrun::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.show_step(1, 3, "CreateGroup");
//! ui.success("Sequence complete");
//! assert!(ui.has_success("Sequence complete"));
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::{format_duration, OutputMode};
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, SeqrunTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show that step `current` of `total` is starting.
    fn show_step(&mut self, current: usize, total: usize, title: &str);

    /// Show captured command output, e.g. after a failed attempt.
    fn show_output(&mut self, output: &str);

}
