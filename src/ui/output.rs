//! Output mode and formatting helpers.

use std::time::Duration;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show progress, status and command output.
    #[default]
    Normal,
    /// Show progress and status only.
    Quiet,
}

impl OutputMode {
    /// Check if this mode echoes command output as it arrives.
    pub fn shows_command_output(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}
