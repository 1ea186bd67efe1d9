//! Configuration source discovery and loading.
//!
//! This module finds configuration sources for a working directory, layers
//! them, and hands the result to the environment resolver.
//!
//! Layers, lowest priority first:
//! 1. The `esbuild` key of the nearest `package.json` (opt-in)
//! 2. `.esbuildrc`
//! 3. `esbuild.config.{json,yaml,yml}` (or the same under `.config/`)

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::env_file::{inject_env, load_env_file};
use crate::config::extends::ExtendsResolver;
use crate::config::interpolation::{env_lookup, expand_config};
use crate::config::merger::merge_layers;
use crate::config::options::CliOptions;
use crate::config::rc_file::parse_rc;
use crate::config::resolver::{resolve, Mode};
use crate::config::schema::{RawConfig, ResolvedConfig, ABS_WORKING_DIR_KEY};
use crate::config::validator::{validate_entry_points, validate_overlays};
use crate::error::{CosbyError, Result};
use crate::ui::Reporter;

/// Config file names searched in a directory, in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "esbuild.config.json",
    "esbuild.config.yaml",
    "esbuild.config.yml",
    ".config/esbuild.json",
    ".config/esbuild.yaml",
    ".config/esbuild.yml",
];

/// RC file name searched in the working directory.
pub const RC_FILE_NAME: &str = ".esbuildrc";

/// Key of `package.json` holding configuration.
pub const PACKAGE_JSON_KEY: &str = "esbuild";

/// Configuration sources found for a working directory.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Nearest `package.json` (only when requested).
    pub package_json: Option<PathBuf>,

    /// `.esbuildrc` in the working directory.
    pub rc_file: Option<PathBuf>,

    /// `esbuild.config.*` in the working directory.
    pub config_file: Option<PathBuf>,
}

impl ConfigSources {
    /// Discover sources for the given working directory.
    pub fn discover(cwd: &Path, include_package_json: bool) -> Self {
        Self {
            package_json: if include_package_json {
                find_package_json(cwd)
            } else {
                None
            },
            rc_file: Some(cwd.join(RC_FILE_NAME)).filter(|path| path.is_file()),
            config_file: find_config_file(cwd),
        }
    }

    /// Returns all existing sources in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.package_json, &self.rc_file, &self.config_file]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Check if no source was found.
    pub fn is_empty(&self) -> bool {
        self.all_existing().is_empty()
    }
}

/// Find the first config file in `dir`.
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Find the nearest `package.json` walking up from `start`.
pub fn find_package_json(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join("package.json"))
        .find(|path| path.is_file())
}

/// Read a configuration document, choosing the parser by file name.
///
/// `.esbuildrc` is parsed in rc9 `key=value` form, `.json` files as JSON,
/// and everything else as YAML.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read.
/// Returns `ConfigParseError` if the content is invalid.
pub fn read_document(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    parse_document(&content, path)
}

/// Parse configuration content for the given source path.
pub fn parse_document(content: &str, source_path: &Path) -> Result<Value> {
    if source_path.file_name().and_then(|name| name.to_str()) == Some(RC_FILE_NAME) {
        return Ok(parse_rc(content));
    }

    let is_json = source_path.extension().and_then(|ext| ext.to_str()) == Some("json");

    let parsed = if is_json {
        serde_json::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| CosbyError::ConfigParseError {
        path: source_path.to_path_buf(),
        message,
    })
}

/// Read the configuration key of a `package.json`.
///
/// Returns `None` when the key is absent.
fn read_package_json_key(path: &Path) -> Result<Option<Value>> {
    let document = read_document(path)?;
    Ok(document.get(PACKAGE_JSON_KEY).cloned())
}

/// A configuration that passed resolution and validation.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The flattened configuration.
    pub config: ResolvedConfig,

    /// Highest-priority source the configuration came from.
    pub source: PathBuf,

    /// Mode overlay that was applied.
    pub mode: Option<Mode>,
}

/// Loads and resolves configuration for one invocation.
#[derive(Debug)]
pub struct ConfigLoader<'a> {
    options: &'a CliOptions,
    mode: Option<Option<Mode>>,
    extends: ExtendsResolver,
}

impl<'a> ConfigLoader<'a> {
    /// Create a loader for the given options.
    ///
    /// The mode is read from `NODE_ENV` at load time unless overridden.
    pub fn new(options: &'a CliOptions) -> Self {
        Self {
            options,
            mode: None,
            extends: ExtendsResolver::new(),
        }
    }

    /// Use a fixed mode instead of reading `NODE_ENV`.
    pub fn with_mode(mut self, mode: Option<Mode>) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Use a custom extends resolver.
    pub fn with_extends_resolver(mut self, extends: ExtendsResolver) -> Self {
        self.extends = extends;
        self
    }

    /// Locate, layer, resolve, and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if no source exists.
    /// Returns `MissingEntryPoints` if the resolved configuration has none.
    /// Returns `ConfigParseError` / `ConfigValidationError` for bad sources.
    pub fn load(&self, reporter: &mut dyn Reporter) -> Result<LoadedConfig> {
        self.apply_dotenv(reporter)?;

        let (mut raw, source) = self.load_raw()?;

        reporter.info(&format!(
            "Using configuration from {}",
            relative_display(&source, &self.options.cwd)
        ));

        validate_overlays(&raw)?;

        if raw.get(ABS_WORKING_DIR_KEY).is_none() {
            raw.insert(
                ABS_WORKING_DIR_KEY,
                Value::String(self.options.cwd.display().to_string()),
            );
        }

        let mode = self.mode.unwrap_or_else(Mode::from_node_env);
        tracing::debug!(
            "Resolving configuration (env: {:?}, mode: {:?})",
            self.options.env_name,
            mode
        );

        let mut config = resolve(&raw, self.options.env_name.as_deref(), mode);
        expand_config(&mut config, &env_lookup);
        validate_entry_points(&config, &source)?;

        Ok(LoadedConfig {
            config,
            source,
            mode,
        })
    }

    /// Locate and layer all sources into one raw document.
    ///
    /// Returns the document and the highest-priority source path.
    pub fn load_raw(&self) -> Result<(RawConfig, PathBuf)> {
        let cwd = &self.options.cwd;
        let sources = ConfigSources::discover(cwd, self.options.package_json);

        let mut layers = Vec::new();
        let mut primary = None;

        for path in sources.all_existing() {
            let document = if Some(path) == sources.package_json.as_ref() {
                match read_package_json_key(path)? {
                    Some(value) => value,
                    None => {
                        tracing::debug!(
                            "{} has no '{}' key, skipping",
                            path.display(),
                            PACKAGE_JSON_KEY
                        );
                        continue;
                    }
                }
            } else {
                read_document(path)?
            };

            if !document.is_object() && !document.is_null() {
                return Err(CosbyError::ConfigParseError {
                    path: path.clone(),
                    message: "expected a mapping at the top level".to_string(),
                });
            }

            tracing::debug!("Loading configuration layer {}", path.display());
            layers.push(self.extends.resolve(document, path)?);
            primary = Some(path.clone());
        }

        let Some(source) = primary else {
            return Err(CosbyError::ConfigNotFound { cwd: cwd.clone() });
        };

        let merged = merge_layers(&layers);
        Ok((RawConfig::from_value(merged, &source)?, source))
    }

    fn apply_dotenv(&self, reporter: &mut dyn Reporter) -> Result<()> {
        let Some(path) = self.options.dotenv_path() else {
            return Ok(());
        };

        if !path.is_file() {
            reporter.warning(&format!(
                "Environment file not found: {}",
                relative_display(&path, &self.options.cwd)
            ));
            return Ok(());
        }

        let vars = load_env_file(&path)?;
        let injected = inject_env(&vars);
        tracing::debug!(
            "Loaded {} variable(s) from {} ({} injected)",
            vars.len(),
            path.display(),
            injected.len()
        );
        Ok(())
    }
}

/// Load and resolve configuration with default loader settings.
pub fn load_config(options: &CliOptions, reporter: &mut dyn Reporter) -> Result<ResolvedConfig> {
    ConfigLoader::new(options)
        .load(reporter)
        .map(|loaded| loaded.config)
}

/// Display `path` relative to `base` when it lies underneath it.
fn relative_display(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
