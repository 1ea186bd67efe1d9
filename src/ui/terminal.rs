//! Terminal reporter.

use console::Term;
use std::io::Write;

use super::{should_use_colors, CosbyTheme, Reporter};

/// Reporter writing styled lines to the terminal.
///
/// Errors go to stderr, everything else to stdout.
pub struct TerminalReporter {
    out: Term,
    err: Term,
    theme: CosbyTheme,
}

impl TerminalReporter {
    /// Create a reporter, enabling colors when appropriate.
    pub fn new() -> Self {
        let theme = if should_use_colors() {
            CosbyTheme::new()
        } else {
            CosbyTheme::plain()
        };
        Self::with_theme(theme)
    }

    /// Create a reporter with an explicit theme.
    pub fn with_theme(theme: CosbyTheme) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TerminalReporter {
    fn blank(&mut self) {
        writeln!(self.out).ok();
    }

    fn info(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_info(msg)).ok();
    }

    fn start(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_start(msg)).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
    }

    fn ready(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_ready(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn fork(&self) -> Box<dyn Reporter> {
        Box::new(Self::with_theme(self.theme.clone()))
    }
}
