//! File-watching rebuild sessions.
//!
//! A session owns a background thread that runs one build cycle right away
//! and then one more for every batch of relevant file changes. Changes are
//! debounced with `notify-debouncer-mini`, and batches that queue up while a
//! cycle is running collapse into a single follow-up cycle.

use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind};

use super::{BuildOutcome, Bundler, RebuildHooks, WatchSession};
use crate::config::ResolvedConfig;
use crate::error::{CosbyError, Result};

/// Directory names whose contents never trigger a rebuild.
const IGNORED_DIR_NAMES: &[&str] = &["node_modules", ".git"];

/// Settings for a watch session.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Quiet period before a batch of changes is reported.
    pub debounce: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
        }
    }
}

/// Message from the file watcher to the session thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSignal {
    /// Paths changed.
    Changed(Vec<PathBuf>),
    /// The watcher reported an error.
    Error(String),
}

/// Decides which changed paths are relevant to a rebuild.
#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    root: PathBuf,
    ignored: Vec<PathBuf>,
}

impl IgnoreFilter {
    /// Build a filter for a project root and its configuration.
    ///
    /// The output directory and output file are ignored so that the
    /// build's own writes do not trigger another build.
    pub fn new(root: &Path, config: &ResolvedConfig) -> Self {
        let mut ignored = Vec::new();
        if let Some(outdir) = config.outdir() {
            ignored.push(root.join(outdir));
        }
        if let Some(outfile) = config.outfile() {
            ignored.push(root.join(outfile));
        }
        Self {
            root: root.to_path_buf(),
            ignored,
        }
    }

    /// Check if a changed path should be ignored.
    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.ignored.iter().any(|ignored| path.starts_with(ignored)) {
            return true;
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative.components().any(|component| match component {
            Component::Normal(name) => IGNORED_DIR_NAMES.iter().any(|n| name == *n),
            _ => false,
        })
    }

    /// Keep only the paths that should trigger a rebuild.
    pub fn relevant<'a>(&self, paths: &'a [PathBuf]) -> Vec<&'a PathBuf> {
        paths.iter().filter(|path| !self.is_ignored(path)).collect()
    }
}

/// Session whose cycles run on a background thread.
pub struct ThreadSession {
    handle: JoinHandle<Result<()>>,
}

impl WatchSession for ThreadSession {
    fn wait(self: Box<Self>) -> Result<()> {
        self.handle.join().map_err(|_| CosbyError::Watch {
            message: "watch thread panicked".to_string(),
        })?
    }
}

/// Run one build cycle, bracketed by the hooks.
pub fn run_cycle(
    bundler: &dyn Bundler,
    config: &ResolvedConfig,
    hooks: &mut dyn RebuildHooks,
) -> BuildOutcome {
    hooks.on_rebuild_start();
    let outcome = match bundler.build(config) {
        Ok(()) => BuildOutcome::Succeeded,
        Err(err) => {
            tracing::debug!("Build cycle failed: {}", err);
            BuildOutcome::Failed(err.to_string())
        }
    };
    hooks.on_rebuild_end(&outcome);
    outcome
}

/// Start watching the configuration's working directory.
///
/// The first cycle runs on the session thread as soon as it starts.
pub fn start_session<B>(
    bundler: B,
    config: ResolvedConfig,
    hooks: Box<dyn RebuildHooks>,
    options: WatchOptions,
) -> Result<ThreadSession>
where
    B: Bundler + Send + 'static,
{
    let root = match config.working_dir() {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let root = root.canonicalize().unwrap_or(root);

    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(options.debounce, move |result: DebounceEventResult| {
        let signal = match result {
            Ok(events) => WatchSignal::Changed(
                events
                    .into_iter()
                    .filter(|event| {
                        matches!(
                            event.kind,
                            DebouncedEventKind::Any | DebouncedEventKind::AnyContinuous
                        )
                    })
                    .map(|event| event.path)
                    .collect(),
            ),
            Err(err) => WatchSignal::Error(err.to_string()),
        };
        // The session thread may already be gone.
        let _ = tx.send(signal);
    })?;

    tracing::debug!("Watching {}", root.display());
    debouncer.watcher().watch(&root, RecursiveMode::Recursive)?;

    let filter = IgnoreFilter::new(&root, &config);
    let handle = thread::Builder::new()
        .name("cosby-watch".to_string())
        .spawn(move || {
            let _debouncer = debouncer;
            run_loop(&bundler, &config, hooks, rx, &filter)
        })?;

    Ok(ThreadSession { handle })
}

/// Drive cycles until the signal channel closes.
///
/// Always ends with an error: a healthy session never returns.
pub fn run_loop(
    bundler: &dyn Bundler,
    config: &ResolvedConfig,
    mut hooks: Box<dyn RebuildHooks>,
    rx: Receiver<WatchSignal>,
    filter: &IgnoreFilter,
) -> Result<()> {
    run_cycle(bundler, config, hooks.as_mut());

    loop {
        let Ok(signal) = rx.recv() else {
            return Err(CosbyError::Watch {
                message: "file watcher stopped".to_string(),
            });
        };

        let mut changed = relevant_count(&signal, filter);
        while let Ok(queued) = rx.try_recv() {
            changed += relevant_count(&queued, filter);
        }

        if changed == 0 {
            continue;
        }

        tracing::debug!("{} relevant change(s), rebuilding", changed);
        run_cycle(bundler, config, hooks.as_mut());
    }
}

fn relevant_count(signal: &WatchSignal, filter: &IgnoreFilter) -> usize {
    match signal {
        WatchSignal::Changed(paths) => {
            let relevant = filter.relevant(paths);
            for path in &relevant {
                tracing::trace!("Changed: {}", path.display());
            }
            relevant.len()
        }
        WatchSignal::Error(message) => {
            tracing::warn!("File watcher error: {}", message);
            0
        }
    }
}
