//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for loading configuration and routing to a command

use std::sync::Arc;

use crate::bundler::Bundler;
use crate::config::{CliOptions, ConfigLoader};
use crate::error::{CosbyError, ErrorKind, Result};
use crate::lifecycle::Clock;
use crate::ui::Reporter;

use super::build::BuildCommand;
use super::watch::WatchCommand;

/// Message reported when no configuration source exists.
pub const CONFIG_NOT_FOUND_MESSAGE: &str = "Required configuration cannot be resolved.";

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `reporter` - Sink for operator-facing events
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, reporter: &mut dyn Reporter) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: u8,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: u8) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Loads configuration and dispatches to the build or watch command.
pub struct CommandDispatcher {
    bundler: Box<dyn Bundler>,
    clock: Arc<dyn Clock>,
}

impl CommandDispatcher {
    /// Create a dispatcher around a bundler and clock.
    pub fn new(bundler: Box<dyn Bundler>, clock: Arc<dyn Clock>) -> Self {
        Self { bundler, clock }
    }

    /// Load configuration for `options` and run the selected command.
    ///
    /// Configuration errors are reported through `reporter` and turned into
    /// a failed [`CommandResult`]. Other errors are returned.
    pub fn dispatch(
        &self,
        options: &CliOptions,
        reporter: &mut dyn Reporter,
    ) -> Result<CommandResult> {
        if options.debug {
            tracing::debug!("CLI Options\n{}", options.to_pretty_json());
        }

        let loaded = match ConfigLoader::new(options).load(reporter) {
            Ok(loaded) => loaded,
            Err(err) if err.kind() == ErrorKind::Config => {
                report_config_error(reporter, &err);
                return Ok(CommandResult::failure(1));
            }
            Err(err) => return Err(err),
        };

        if options.debug {
            tracing::debug!("Esbuild Config\n{}", loaded.config.to_pretty_json());
        }

        if options.watch {
            WatchCommand::new(
                self.bundler.as_ref(),
                Arc::clone(&self.clock),
                &loaded.config,
                options.clean,
            )
            .execute(reporter)
        } else {
            BuildCommand::new(
                self.bundler.as_ref(),
                self.clock.as_ref(),
                &loaded.config,
                options.clean,
            )
            .execute(reporter)
        }
    }
}

fn report_config_error(reporter: &mut dyn Reporter, err: &CosbyError) {
    if matches!(err, CosbyError::ConfigNotFound { .. }) {
        reporter.error(CONFIG_NOT_FOUND_MESSAGE);
    }
    reporter.error(&err.to_string());
}
