//! One-shot build controller.

use std::time::Duration;

use super::clean::clean_outdir;
use super::clock::Clock;
use super::format_seconds;
use crate::bundler::Bundler;
use crate::config::ResolvedConfig;
use crate::error::{CosbyError, Result};
use crate::ui::Reporter;

/// Run a single build and report how long it took.
///
/// With `clean` set, the output directory is removed first. Configurations
/// that only name an output file are never cleaned.
///
/// Returns `Some(elapsed)` after reporting success and `None` when the
/// bundler rejected the build. A rejected build is not an error here:
/// the bundler has already printed its diagnostics.
///
/// # Errors
///
/// Returns `BundlerUnavailable` if the bundler could not be started and
/// `Io` if the output directory could not be removed.
pub fn run_build(
    bundler: &dyn Bundler,
    reporter: &mut dyn Reporter,
    clock: &dyn Clock,
    config: &ResolvedConfig,
    clean: bool,
) -> Result<Option<Duration>> {
    reporter.blank();

    if clean {
        if let Some(outdir) = config.output_dir() {
            clean_outdir(reporter, &outdir)?;
        }
    }

    let start = clock.now();

    match bundler.build(config) {
        Ok(()) => {}
        Err(CosbyError::BuildFailure { code }) => {
            tracing::debug!("Build failed (exit code {:?})", code);
            return Ok(None);
        }
        Err(err) => return Err(err),
    }

    let elapsed = clock.now().saturating_duration_since(start);
    reporter.success(&format!("Build completed in {}s.", format_seconds(elapsed)));

    Ok(Some(elapsed))
}
