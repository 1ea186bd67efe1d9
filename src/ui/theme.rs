//! Visual theme and styling.

use console::Style;

/// Cosby's visual theme.
#[derive(Debug, Clone)]
pub struct CosbyTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (yellow).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for informational messages (cyan).
    pub info: Style,
    /// Style for start messages (magenta).
    pub start: Style,
    /// Style for ready messages (green bold).
    pub ready: Style,
}

impl Default for CosbyTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl CosbyTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            info: Style::new().cyan(),
            start: Style::new().magenta(),
            ready: Style::new().green().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or `NO_COLOR`).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            start: Style::new(),
            ready: Style::new(),
        }
    }

    /// Format a success message.
    pub fn format_success(&self, msg: &str) -> String {
        format!("{} {}", self.success.apply_to("✔"), msg)
    }

    /// Format a warning message.
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message.
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✖ {}", msg)))
    }

    /// Format an informational message.
    pub fn format_info(&self, msg: &str) -> String {
        format!("{} {}", self.info.apply_to("ℹ"), msg)
    }

    /// Format a start message.
    pub fn format_start(&self, msg: &str) -> String {
        format!("{} {}", self.start.apply_to("◐"), msg)
    }

    /// Format a ready message.
    pub fn format_ready(&self, msg: &str) -> String {
        format!("{} {}", self.ready.apply_to("✔"), msg)
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}
