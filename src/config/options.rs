//! Invocation options consumed by the config loader and lifecycle.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Options describing one invocation.
///
/// Produced by the CLI layer; `cwd` is expected to be absolute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliOptions {
    /// Directory the configuration search starts from.
    pub cwd: PathBuf,
    /// Run a persistent watch session instead of a one-shot build.
    pub watch: bool,
    /// Remove the output directory before each build.
    pub clean: bool,
    /// Print additional debug information.
    pub debug: bool,
    /// Name of the `$env` overlay to apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_name: Option<String>,
    /// `.env` file to inject before parsing configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotenv: Option<PathBuf>,
    /// Also read the `esbuild` key of the nearest `package.json`.
    pub package_json: bool,
}

impl CliOptions {
    /// Create options for a working directory with everything else off.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            ..Default::default()
        }
    }

    /// The `.env` path resolved against `cwd`.
    pub fn dotenv_path(&self) -> Option<PathBuf> {
        self.dotenv.as_deref().map(|path| self.resolve(path))
    }

    /// Resolve a possibly-relative path against `cwd`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Render as pretty JSON for debug output.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
