//! Watch session controller.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::clean::clean_outdir;
use super::clock::Clock;
use super::format_seconds;
use crate::bundler::{BuildOutcome, Bundler, RebuildHooks, WatchSession};
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::ui::Reporter;

/// Hooks that clean, time, and report every rebuild cycle.
///
/// Holds the single start timestamp of the session; each cycle overwrites
/// it, so a duration always belongs to its own cycle.
pub struct LifecycleHooks {
    reporter: Box<dyn Reporter>,
    clock: Arc<dyn Clock>,
    outdir: Option<PathBuf>,
    clean: bool,
    started: Option<Instant>,
}

impl LifecycleHooks {
    /// Create hooks for a configuration.
    pub fn new(
        reporter: Box<dyn Reporter>,
        clock: Arc<dyn Clock>,
        config: &ResolvedConfig,
        clean: bool,
    ) -> Self {
        Self {
            reporter,
            clock,
            outdir: config.output_dir(),
            clean,
            started: None,
        }
    }
}

impl RebuildHooks for LifecycleHooks {
    fn on_rebuild_start(&mut self) {
        self.reporter.blank();

        if self.clean {
            if let Some(outdir) = &self.outdir {
                if let Err(err) = clean_outdir(self.reporter.as_mut(), outdir) {
                    self.reporter
                        .error(&format!("Failed to clean output directory: {}", err));
                }
            }
        }

        self.reporter.start("Build started");
        self.started = Some(self.clock.now());
    }

    fn on_rebuild_end(&mut self, outcome: &BuildOutcome) {
        let end = self.clock.now();
        let elapsed = self
            .started
            .take()
            .map_or(Duration::ZERO, |start| end.saturating_duration_since(start));

        if let BuildOutcome::Failed(reason) = outcome {
            tracing::debug!("Rebuild failed: {}", reason);
        }

        self.reporter.ready(&format!(
            "Build completed in {}s, watching for changes...",
            format_seconds(elapsed)
        ));
    }
}

/// Start a watch session that cleans, times, and reports every cycle.
///
/// Returns once the session is established. Call
/// [`WatchSession::wait`] to block for the lifetime of the session.
///
/// # Errors
///
/// Returns `BundlerUnavailable` or `Watch` if the session cannot be started.
pub fn run_watch(
    bundler: &dyn Bundler,
    reporter: Box<dyn Reporter>,
    clock: Arc<dyn Clock>,
    config: &ResolvedConfig,
    clean: bool,
) -> Result<Box<dyn WatchSession>> {
    let hooks = LifecycleHooks::new(reporter, clock, config, clean);
    bundler.watch(config, Box::new(hooks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::MockBundler;
    use crate::config::{resolve, RawConfig};
    use crate::lifecycle::ManualClock;
    use crate::ui::{MockReporter, ReportLevel};
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> ResolvedConfig {
        let raw = RawConfig::from_value(
            json!({
                "entryPoints": ["src/index.ts"],
                "outdir": "dist",
                "absWorkingDir": dir.display().to_string()
            }),
            Path::new("esbuild.config.json"),
        )
        .unwrap();
        resolve(&raw, None, None)
    }

    #[test]
    fn each_cycle_reports_its_own_duration() {
        let bundler = MockBundler::new();
        let reporter = MockReporter::new();
        let clock = Arc::new(ManualClock::with_ticks([
            Duration::from_secs(0),
            Duration::from_millis(1200),
            Duration::from_secs(10),
            Duration::from_millis(10_300),
        ]));

        let session = run_watch(
            &bundler,
            Box::new(reporter.clone()),
            clock,
            &ResolvedConfig::default(),
            false,
        )
        .unwrap();
        bundler.trigger_rebuild();

        assert_eq!(
            reporter.readies(),
            vec![
                "Build completed in 1.200s, watching for changes...".to_string(),
                "Build completed in 0.300s, watching for changes...".to_string(),
            ]
        );
        assert_eq!(reporter.starts(), vec!["Build started", "Build started"]);
        assert!(session.wait().is_ok());
    }

    #[test]
    fn failed_rebuild_still_reports_duration() {
        let bundler = MockBundler::new();
        bundler.fail_next();
        let reporter = MockReporter::new();

        run_watch(
            &bundler,
            Box::new(reporter.clone()),
            Arc::new(ManualClock::new()),
            &ResolvedConfig::default(),
            false,
        )
        .unwrap();

        assert_eq!(
            reporter.levels(),
            vec![ReportLevel::Blank, ReportLevel::Start, ReportLevel::Ready]
        );
        assert!(reporter.successes().is_empty());
    }

    #[test]
    fn clean_runs_before_every_cycle() {
        let temp = TempDir::new().unwrap();
        let outdir = temp.path().join("dist");
        fs::create_dir_all(&outdir).unwrap();
        let bundler = MockBundler::new();
        let reporter = MockReporter::new();

        run_watch(
            &bundler,
            Box::new(reporter.clone()),
            Arc::new(ManualClock::new()),
            &config_in(temp.path()),
            true,
        )
        .unwrap();
        fs::create_dir_all(&outdir).unwrap();
        bundler.trigger_rebuild();

        assert_eq!(bundler.outdir_existed(), vec![false, false]);
        assert_eq!(
            reporter.levels(),
            vec![
                ReportLevel::Blank,
                ReportLevel::Info,
                ReportLevel::Start,
                ReportLevel::Ready,
                ReportLevel::Blank,
                ReportLevel::Info,
                ReportLevel::Start,
                ReportLevel::Ready,
            ]
        );
    }

    #[test]
    fn without_clean_outdir_survives_cycles() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("dist")).unwrap();
        let bundler = MockBundler::new();
        let reporter = MockReporter::new();

        run_watch(
            &bundler,
            Box::new(reporter.clone()),
            Arc::new(ManualClock::new()),
            &config_in(temp.path()),
            false,
        )
        .unwrap();
        bundler.trigger_rebuild();

        assert_eq!(bundler.outdir_existed(), vec![true, true]);
        assert!(!reporter.has_info("Cleaning"));
    }

    #[test]
    fn unavailable_bundler_fails_to_start() {
        let bundler = MockBundler::new();
        bundler.set_unavailable();

        let result = run_watch(
            &bundler,
            Box::new(MockReporter::new()),
            Arc::new(ManualClock::new()),
            &ResolvedConfig::default(),
            false,
        );

        assert!(result.is_err());
    }
}
