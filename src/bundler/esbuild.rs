//! Bundler backed by the `esbuild` executable.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::args::build_args;
use super::watcher::{self, WatchOptions};
use super::{Bundler, RebuildHooks, WatchSession};
use crate::config::ResolvedConfig;
use crate::error::{CosbyError, Result};

/// Environment variable overriding the esbuild executable.
pub const ESBUILD_ENV_VAR: &str = "COSBY_ESBUILD";

#[cfg(windows)]
const LOCAL_BIN: &str = "node_modules/.bin/esbuild.cmd";
#[cfg(not(windows))]
const LOCAL_BIN: &str = "node_modules/.bin/esbuild";

/// Runs builds through the `esbuild` command line.
///
/// The child process inherits stdio, so esbuild's own diagnostics reach the
/// terminal unchanged.
#[derive(Debug, Clone)]
pub struct EsbuildCli {
    program: OsString,
    watch_options: WatchOptions,
}

impl EsbuildCli {
    /// Use an explicit executable.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            watch_options: WatchOptions::default(),
        }
    }

    /// Find the executable for a project directory.
    ///
    /// Lookup order: `COSBY_ESBUILD`, then `node_modules/.bin/esbuild` in
    /// `cwd` or any ancestor, then `esbuild` on `PATH`.
    pub fn locate(cwd: &Path) -> Self {
        if let Some(program) = std::env::var_os(ESBUILD_ENV_VAR).filter(|p| !p.is_empty()) {
            tracing::debug!("Using esbuild from {}", ESBUILD_ENV_VAR);
            return Self::new(program);
        }

        if let Some(local) = find_local_bin(cwd) {
            tracing::debug!("Using local esbuild at {}", local.display());
            return Self::new(local);
        }

        tracing::debug!("Using esbuild from PATH");
        Self::new("esbuild")
    }

    /// Override watch session settings.
    pub fn with_watch_options(mut self, options: WatchOptions) -> Self {
        self.watch_options = options;
        self
    }

    /// The executable that will be run.
    pub fn program(&self) -> &Path {
        Path::new(&self.program)
    }

    fn command(&self, config: &ResolvedConfig) -> Command {
        let mut command = Command::new(&self.program);
        command.args(build_args(config));
        if let Some(dir) = config.working_dir() {
            command.current_dir(dir);
        }
        command
    }

    fn unavailable(&self, err: std::io::Error) -> CosbyError {
        CosbyError::BundlerUnavailable {
            program: self.program().display().to_string(),
            message: err.to_string(),
        }
    }

    /// Check that the executable can be started.
    pub fn probe(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            return Err(CosbyError::BundlerUnavailable {
                program: self.program().display().to_string(),
                message: format!("'--version' exited with {}", output.status),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Bundler for EsbuildCli {
    fn build(&self, config: &ResolvedConfig) -> Result<()> {
        let mut command = self.command(config);
        tracing::debug!("Running {:?}", command);

        let status = command
            .stdin(Stdio::null())
            .status()
            .map_err(|e| self.unavailable(e))?;

        if status.success() {
            Ok(())
        } else {
            Err(CosbyError::BuildFailure {
                code: status.code(),
            })
        }
    }

    fn watch(
        &self,
        config: &ResolvedConfig,
        hooks: Box<dyn RebuildHooks>,
    ) -> Result<Box<dyn WatchSession>> {
        let version = self.probe()?;
        tracing::debug!("esbuild version {}", version);

        let session = watcher::start_session(
            self.clone(),
            config.clone(),
            hooks,
            self.watch_options.clone(),
        )?;
        Ok(Box::new(session))
    }
}

fn find_local_bin(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(LOCAL_BIN))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn find_local_bin_walks_up() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join(LOCAL_BIN);
        fs::create_dir_all(bin.parent().unwrap()).unwrap();
        fs::write(&bin, "").unwrap();
        let nested = temp.path().join("packages/web");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_local_bin(&nested), Some(bin));
    }

    #[test]
    fn find_local_bin_none_without_node_modules() {
        let temp = TempDir::new().unwrap();
        // An ancestor of the temp dir could in theory carry node_modules.
        let found = find_local_bin(temp.path());
        assert!(found.map_or(true, |p| !p.starts_with(temp.path())));
    }

    #[test]
    fn missing_program_is_unavailable() {
        let bundler = EsbuildCli::new("cosby-esbuild-that-does-not-exist");
        let config = ResolvedConfig::default();

        let result = bundler.build(&config);

        assert!(matches!(
            result,
            Err(CosbyError::BundlerUnavailable { .. })
        ));
    }

    #[test]
    fn probe_reports_missing_program() {
        let bundler = EsbuildCli::new("cosby-esbuild-that-does-not-exist");
        assert!(matches!(
            bundler.probe(),
            Err(CosbyError::BundlerUnavailable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_build_failure() {
        let bundler = EsbuildCli::new("false");
        let config = ResolvedConfig::default();

        let result = bundler.build(&config);

        assert!(matches!(result, Err(CosbyError::BuildFailure { code: Some(1) })));
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_is_success() {
        let bundler = EsbuildCli::new("true");
        assert!(bundler.build(&ResolvedConfig::default()).is_ok());
    }
}
