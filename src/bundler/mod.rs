//! Bundler abstraction.
//!
//! The lifecycle controllers never talk to esbuild directly. They go through
//! the [`Bundler`] trait, which has two implementations:
//! - [`EsbuildCli`] runs the `esbuild` executable
//! - [`MockBundler`] records invocations for tests
//!
//! A watch session reports every rebuild cycle through [`RebuildHooks`], so
//! the caller can clean and time each cycle without knowing how changes are
//! detected.

pub mod args;
pub mod esbuild;
pub mod mock;
pub mod watcher;

pub use args::build_args;
pub use esbuild::EsbuildCli;
pub use mock::{MockBundler, MockWatchHandle};

use crate::config::ResolvedConfig;
use crate::error::Result;

/// Result of one build cycle in a watch session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The bundler produced output.
    Succeeded,
    /// The bundler reported errors. The message is for logging only; the
    /// bundler has already printed its diagnostics.
    Failed(String),
}

impl BuildOutcome {
    /// Check if the cycle succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Callbacks invoked around every build cycle of a watch session.
///
/// Cycles are strictly serialized: `on_rebuild_end` for one cycle always
/// returns before `on_rebuild_start` of the next.
pub trait RebuildHooks: Send {
    /// Called before the bundler starts a cycle.
    fn on_rebuild_start(&mut self);

    /// Called after the bundler finished a cycle.
    fn on_rebuild_end(&mut self, outcome: &BuildOutcome);
}

/// A running watch session.
pub trait WatchSession: Send {
    /// Block until the session ends.
    ///
    /// Sessions backed by a file watcher only end when the watcher fails.
    fn wait(self: Box<Self>) -> Result<()>;
}

/// Something that can build a resolved configuration.
pub trait Bundler {
    /// Run a single build.
    ///
    /// # Errors
    ///
    /// Returns `BuildFailure` when the bundler reports errors and
    /// `BundlerUnavailable` when it cannot be started at all.
    fn build(&self, config: &ResolvedConfig) -> Result<()>;

    /// Start a persistent session that rebuilds on change.
    ///
    /// The first cycle is started by the session itself. Returns once the
    /// session is established.
    fn watch(
        &self,
        config: &ResolvedConfig,
        hooks: Box<dyn RebuildHooks>,
    ) -> Result<Box<dyn WatchSession>>;
}
