//! Integration tests for the lifecycle controllers.

use cosby::bundler::{build_args, BuildOutcome, MockBundler};
use cosby::config::{resolve, Mode, RawConfig};
use cosby::lifecycle::{run_build, run_watch, ManualClock};
use cosby::ui::{MockReporter, ReportLevel};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn raw(value: serde_json::Value) -> RawConfig {
    RawConfig::from_value(value, Path::new("esbuild.config.json")).unwrap()
}

#[test]
fn build_reports_exact_duration() {
    let config = resolve(&raw(json!({"entryPoints": ["src/index.ts"]})), None, None);
    let bundler = MockBundler::new();
    let mut reporter = MockReporter::new();
    let clock = ManualClock::with_ticks([Duration::ZERO, Duration::from_millis(2500)]);

    run_build(&bundler, &mut reporter, &clock, &config, false).unwrap();

    assert_eq!(reporter.successes(), vec!["Build completed in 2.500s."]);
}

#[test]
fn build_failure_is_swallowed() {
    let config = resolve(&raw(json!({"entryPoints": ["src/index.ts"]})), None, None);
    let bundler = MockBundler::new();
    bundler.fail_next();
    let mut reporter = MockReporter::new();

    let result = run_build(&bundler, &mut reporter, &ManualClock::new(), &config, false);

    assert!(matches!(result, Ok(None)));
    assert!(!reporter.levels().contains(&ReportLevel::Success));
}

#[test]
fn clean_happens_before_bundler_runs() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("dist")).unwrap();
    let config = resolve(
        &raw(json!({
            "entryPoints": ["src/index.ts"],
            "outdir": "dist",
            "absWorkingDir": temp.path().display().to_string()
        })),
        None,
        None,
    );
    let bundler = MockBundler::new();
    let mut reporter = MockReporter::new();

    run_build(&bundler, &mut reporter, &ManualClock::new(), &config, true).unwrap();

    assert_eq!(bundler.outdir_existed(), vec![false]);
}

#[test]
fn watch_cycles_use_their_own_start() {
    let config = resolve(&raw(json!({"entryPoints": ["src/index.ts"]})), None, None);
    let bundler = MockBundler::new();
    let reporter = MockReporter::new();
    let clock = Arc::new(ManualClock::with_ticks([
        Duration::from_millis(0),
        Duration::from_millis(500),
        Duration::from_millis(5000),
        Duration::from_millis(5750),
    ]));

    let session = run_watch(&bundler, Box::new(reporter.clone()), clock, &config, false).unwrap();
    bundler.fail_next();
    assert!(matches!(
        bundler.trigger_rebuild(),
        Some(BuildOutcome::Failed(_))
    ));

    assert_eq!(
        reporter.readies(),
        vec![
            "Build completed in 0.500s, watching for changes...",
            "Build completed in 0.750s, watching for changes...",
        ]
    );
    session.wait().unwrap();
}

#[test]
fn resolved_config_translates_to_esbuild_args() {
    let config = resolve(
        &raw(json!({
            "entryPoints": ["src/index.ts"],
            "bundle": true,
            "minify": false,
            "$production": {"minify": true, "define": {"DEBUG": "false"}}
        })),
        None,
        Some(Mode::Production),
    );

    assert_eq!(
        build_args(&config),
        vec!["src/index.ts", "--bundle", "--minify", "--define:DEBUG=false"]
    );
}
