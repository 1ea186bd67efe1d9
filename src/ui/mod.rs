//! Operator-facing reporting.
//!
//! This module provides:
//! - [`Reporter`] trait for the events the lifecycle emits
//! - [`TerminalReporter`] for interactive terminal usage
//! - [`MockReporter`] for capturing events in tests
//!
//! Diagnostic logging goes through `tracing`; a `Reporter` only carries the
//! handful of messages an operator is expected to read.
//!
//! # Example
//!
//! ```
//! use cosby::ui::{MockReporter, Reporter};
//!
//! let mut reporter = MockReporter::new();
//! reporter.start("Build started");
//! reporter.success("Build completed in 0.042s.");
//!
//! assert!(reporter.has_success("0.042s"));
//! ```

pub mod mock;
pub mod terminal;
pub mod theme;

pub use mock::{MockReporter, ReportEvent, ReportLevel};
pub use terminal::TerminalReporter;
pub use theme::{should_use_colors, CosbyTheme};

/// Sink for lifecycle events.
///
/// Implementations must be `Send` so a watch session can report from its
/// own thread.
pub trait Reporter: Send {
    /// Emit an empty line to separate build cycles.
    fn blank(&mut self);

    /// Display an informational message.
    fn info(&mut self, msg: &str);

    /// Display a "something started" message.
    fn start(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a "ready and waiting" message.
    fn ready(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Create a reporter writing to the same destination, for use on
    /// another thread.
    fn fork(&self) -> Box<dyn Reporter>;
}
