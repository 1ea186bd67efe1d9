//! Mock reporter implementation for testing.
//!
//! `MockReporter` implements the `Reporter` trait and captures every event
//! for later assertion. Clones share the same event log, so a clone handed
//! to a watch session can be inspected from the test that created it.
//!
//! # Example
//!
//! ```
//! use cosby::ui::{MockReporter, ReportLevel, Reporter};
//!
//! let reporter = MockReporter::new();
//! let mut session_side = reporter.clone();
//! session_side.ready("Build completed in 0.100s, watching for changes...");
//!
//! assert_eq!(reporter.levels(), vec![ReportLevel::Ready]);
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use super::Reporter;

/// Kind of reported event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Blank,
    Info,
    Start,
    Success,
    Ready,
    Warning,
    Error,
}

/// A single captured event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEvent {
    /// Event kind.
    pub level: ReportLevel,
    /// Message text (empty for blank lines).
    pub message: String,
}

/// Mock reporter capturing events in order.
#[derive(Debug, Clone, Default)]
pub struct MockReporter {
    events: Arc<Mutex<Vec<ReportEvent>>>,
}

impl MockReporter {
    /// Create an empty mock reporter.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ReportEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, level: ReportLevel, message: &str) {
        self.lock().push(ReportEvent {
            level,
            message: message.to_string(),
        });
    }

    /// All captured events, in order.
    pub fn events(&self) -> Vec<ReportEvent> {
        self.lock().clone()
    }

    /// Levels of all captured events, in order.
    pub fn levels(&self) -> Vec<ReportLevel> {
        self.lock().iter().map(|e| e.level).collect()
    }

    /// Messages captured at a given level.
    pub fn messages(&self, level: ReportLevel) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    /// Captured info messages.
    pub fn infos(&self) -> Vec<String> {
        self.messages(ReportLevel::Info)
    }

    /// Captured start messages.
    pub fn starts(&self) -> Vec<String> {
        self.messages(ReportLevel::Start)
    }

    /// Captured success messages.
    pub fn successes(&self) -> Vec<String> {
        self.messages(ReportLevel::Success)
    }

    /// Captured ready messages.
    pub fn readies(&self) -> Vec<String> {
        self.messages(ReportLevel::Ready)
    }

    /// Captured warning messages.
    pub fn warnings(&self) -> Vec<String> {
        self.messages(ReportLevel::Warning)
    }

    /// Captured error messages.
    pub fn errors(&self) -> Vec<String> {
        self.messages(ReportLevel::Error)
    }

    /// Check if an info message containing `msg` was shown.
    pub fn has_info(&self, msg: &str) -> bool {
        self.infos().iter().any(|m| m.contains(msg))
    }

    /// Check if a success message containing `msg` was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes().iter().any(|m| m.contains(msg))
    }

    /// Check if an error message containing `msg` was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors().iter().any(|m| m.contains(msg))
    }

    /// Forget all captured events.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Reporter for MockReporter {
    fn blank(&mut self) {
        self.push(ReportLevel::Blank, "");
    }

    fn info(&mut self, msg: &str) {
        self.push(ReportLevel::Info, msg);
    }

    fn start(&mut self, msg: &str) {
        self.push(ReportLevel::Start, msg);
    }

    fn success(&mut self, msg: &str) {
        self.push(ReportLevel::Success, msg);
    }

    fn ready(&mut self, msg: &str) {
        self.push(ReportLevel::Ready, msg);
    }

    fn warning(&mut self, msg: &str) {
        self.push(ReportLevel::Warning, msg);
    }

    fn error(&mut self, msg: &str) {
        self.push(ReportLevel::Error, msg);
    }

    fn fork(&self) -> Box<dyn Reporter> {
        Box::new(self.clone())
    }
}
