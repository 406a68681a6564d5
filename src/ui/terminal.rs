//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{should_use_colors, OutputMode, SeqrunTheme, UserInterface};

/// Terminal UI implementation. Errors go to stderr, everything else to stdout.
pub struct TerminalUI {
    term: Term,
    err_term: Term,
    theme: SeqrunTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            SeqrunTheme::new()
        } else {
            SeqrunTheme::plain()
        };

        Self {
            term: Term::stdout(),
            err_term: Term::stderr(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        writeln!(self.term, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err_term, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        writeln!(self.term, "{}", self.theme.format_header(title)).ok();
    }

    fn show_step(&mut self, current: usize, total: usize, title: &str) {
        writeln!(self.term, "{}", self.theme.format_step(current, total, title)).ok();
    }

    fn show_output(&mut self, output: &str) {
        for line in output.lines() {
            writeln!(self.term, "  {}", self.theme.command.apply_to(line)).ok();
        }
    }
}

/// Create the UI for the given mode.
pub fn create_ui(mode: OutputMode) -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new(mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ui_output_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn create_ui_respects_mode() {
        let ui = create_ui(OutputMode::Normal);
        assert_eq!(ui.output_mode(), OutputMode::Normal);
    }
}
