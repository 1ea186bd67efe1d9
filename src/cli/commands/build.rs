//! One-shot build command.

use crate::bundler::Bundler;
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::lifecycle::{run_build, Clock};
use crate::ui::Reporter;

use super::dispatcher::{Command, CommandResult};

/// Builds the configuration once.
pub struct BuildCommand<'a> {
    bundler: &'a dyn Bundler,
    clock: &'a dyn Clock,
    config: &'a ResolvedConfig,
    clean: bool,
}

impl<'a> BuildCommand<'a> {
    /// Create the command.
    pub fn new(
        bundler: &'a dyn Bundler,
        clock: &'a dyn Clock,
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

impl Command for BuildCommand<'_> {
    fn execute(&self, reporter: &mut dyn Reporter) -> Result<CommandResult> {
        match run_build(self.bundler, reporter, self.clock, self.config, self.clean)? {
            Some(_) => Ok(CommandResult::success()),
            None => Ok(CommandResult::failure(1)),
        }
    }
}
