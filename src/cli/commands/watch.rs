//! Watch command.

use std::sync::Arc;

use crate::bundler::Bundler;
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::lifecycle::{run_watch, Clock};
use crate::ui::Reporter;

use super::dispatcher::{Command, CommandResult};

/// Rebuilds the configuration on every change until the session ends.
pub struct WatchCommand<'a> {
    bundler: &'a dyn Bundler,
    clock: Arc<dyn Clock>,
    config: &'a ResolvedConfig,
    clean: bool,
}

impl<'a> WatchCommand<'a> {
    /// Create the command.
    pub fn new(
        bundler: &'a dyn Bundler,
        clock: Arc<dyn Clock>,
        config: &'a ResolvedConfig,
        clean: bool,
    ) -> Self {
        Self {
            bundler,
            clock,
            config,
            clean,
        }
    }
}

impl Command for WatchCommand<'_> {
    fn execute(&self, reporter: &mut dyn Reporter) -> Result<CommandResult> {
        let session = run_watch(
            self.bundler,
            reporter.fork(),
            Arc::clone(&self.clock),
            self.config,
            self.clean,
        )?;

        session.wait()?;
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::MockBundler;
    use crate::lifecycle::ManualClock;
    use crate::ui::MockReporter;

    #[test]
    fn reports_first_cycle_through_forked_reporter() {
        let bundler = MockBundler::new();
        let config = ResolvedConfig::default();
        let mut reporter = MockReporter::new();

        let result = WatchCommand::new(&bundler, Arc::new(ManualClock::new()), &config, false)
            .execute(&mut reporter)
            .unwrap();

        assert!(result.success);
        assert_eq!(reporter.starts(), vec!["Build started".to_string()]);
        assert_eq!(reporter.readies().len(), 1);
    }

    #[test]
    fn unavailable_bundler_is_an_error() {
        let bundler = MockBundler::new();
        bundler.set_unavailable();
        let config = ResolvedConfig::default();
        let mut reporter = MockReporter::new();

        let result = WatchCommand::new(&bundler, Arc::new(ManualClock::new()), &config, false)
            .execute(&mut reporter);

        assert!(result.is_err());
    }
}
