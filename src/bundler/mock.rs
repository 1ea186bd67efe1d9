//! In-memory bundler for tests.
//!
//! `MockBundler` records every build it is asked to run and fails on demand.
//! Its watch sessions never touch the file system: the first cycle runs
//! inside [`Bundler::watch`], and further cycles run when the test calls
//! [`MockBundler::trigger_rebuild`].
//!
//! # Example
//!
//! ```
//! use cosby::bundler::{Bundler, MockBundler};
//! use cosby::config::ResolvedConfig;
//!
//! let bundler = MockBundler::new();
//! bundler.fail_next();
//!
//! assert!(bundler.build(&ResolvedConfig::default()).is_err());
//! assert!(bundler.build(&ResolvedConfig::default()).is_ok());
//! assert_eq!(bundler.build_count(), 2);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use super::watcher::run_cycle;
use super::{BuildOutcome, Bundler, RebuildHooks, WatchSession};
use crate::config::ResolvedConfig;
use crate::error::{CosbyError, Result};

#[derive(Debug, Default)]
struct BuildLog {
    builds: usize,
    outdir_existed: Vec<bool>,
    failures: VecDeque<Option<i32>>,
    unavailable: bool,
}

#[derive(Default)]
struct WatchState {
    config: Option<ResolvedConfig>,
    hooks: Option<Box<dyn RebuildHooks>>,
}

/// Bundler double that records invocations.
///
/// Clones share state, so a clone moved into a session can be inspected
/// from the test.
#[derive(Clone, Default)]
pub struct MockBundler {
    log: Arc<Mutex<BuildLog>>,
    watch: Arc<Mutex<WatchState>>,
}

impl std::fmt::Debug for MockBundler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBundler")
            .field("log", &*self.log())
            .finish_non_exhaustive()
    }
}

impl MockBundler {
    /// Create a bundler whose builds all succeed.
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, BuildLog> {
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn watch_state(&self) -> MutexGuard<'_, WatchState> {
        self.watch.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make the next build fail with exit code 1.
    pub fn fail_next(&self) {
        self.fail_next_with(Some(1));
    }

    /// Make the next build fail with the given exit code.
    pub fn fail_next_with(&self, code: Option<i32>) {
        self.log().failures.push_back(code);
    }

    /// Behave as if the bundler executable were missing.
    pub fn set_unavailable(&self) {
        self.log().unavailable = true;
    }

    /// Number of builds run so far.
    pub fn build_count(&self) -> usize {
        self.log().builds
    }

    /// For each build, whether the output directory existed when it started.
    pub fn outdir_existed(&self) -> Vec<bool> {
        self.log().outdir_existed.clone()
    }

    /// Run one more cycle of the active watch session.
    ///
    /// Returns `None` if no session has been started.
    pub fn trigger_rebuild(&self) -> Option<BuildOutcome> {
        let (config, mut hooks) = {
            let mut state = self.watch_state();
            (state.config.clone()?, state.hooks.take()?)
        };

        let outcome = run_cycle(self, &config, hooks.as_mut());
        self.watch_state().hooks = Some(hooks);
        Some(outcome)
    }

    fn unavailable_error() -> CosbyError {
        CosbyError::BundlerUnavailable {
            program: "mock".to_string(),
            message: "marked unavailable".to_string(),
        }
    }
}

impl Bundler for MockBundler {
    fn build(&self, config: &ResolvedConfig) -> Result<()> {
        let mut log = self.log();
        if log.unavailable {
            return Err(Self::unavailable_error());
        }

        log.builds += 1;
        let existed = config.output_dir().is_some_and(|dir| dir.exists());
        log.outdir_existed.push(existed);

        match log.failures.pop_front() {
            Some(code) => Err(CosbyError::BuildFailure { code }),
            None => Ok(()),
        }
    }

    fn watch(
        &self,
        config: &ResolvedConfig,
        mut hooks: Box<dyn RebuildHooks>,
    ) -> Result<Box<dyn WatchSession>> {
        if self.log().unavailable {
            return Err(Self::unavailable_error());
        }

        run_cycle(self, config, hooks.as_mut());

        let mut state = self.watch_state();
        state.config = Some(config.clone());
        state.hooks = Some(hooks);

        Ok(Box::new(MockWatchHandle))
    }
}

/// Session returned by [`MockBundler::watch`]. Waiting returns at once.
#[derive(Debug)]
pub struct MockWatchHandle;

impl WatchSession for MockWatchHandle {
    fn wait(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
