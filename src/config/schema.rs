//! Configuration document shapes.
//!
//! A [`RawConfig`] is whatever the configuration sources produced: an open
//! mapping of bundler option names to values, possibly carrying overlay keys
//! (`$development`, `$test`, `$production`, `$env`) and an `extends` key.
//!
//! A [`ResolvedConfig`] is the flattened result of environment resolution.
//! It can only be produced by [`resolve`](super::resolve), which guarantees
//! that none of the reserved keys survive.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CosbyError, Result};

/// Ordered mapping of option names to values.
pub type ConfigMap = serde_json::Map<String, Value>;

/// Overlay applied in development mode.
pub const DEVELOPMENT_KEY: &str = "$development";
/// Overlay applied in test mode.
pub const TEST_KEY: &str = "$test";
/// Overlay applied in production mode.
pub const PRODUCTION_KEY: &str = "$production";
/// Mapping of environment names to overlays.
pub const ENV_KEY: &str = "$env";
/// Parent configuration(s) merged beneath this one.
pub const EXTENDS_KEY: &str = "extends";

/// The four overlay keys that never reach the bundler.
pub const RESERVED_KEYS: [&str; 4] = [DEVELOPMENT_KEY, TEST_KEY, PRODUCTION_KEY, ENV_KEY];

/// Bundler option naming the entry points.
pub const ENTRY_POINTS_KEY: &str = "entryPoints";
/// Bundler option naming the output directory.
pub const OUTDIR_KEY: &str = "outdir";
/// Bundler option naming a single output file.
pub const OUTFILE_KEY: &str = "outfile";
/// Bundler option naming the directory relative paths resolve against.
pub const ABS_WORKING_DIR_KEY: &str = "absWorkingDir";

/// Unresolved configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawConfig(ConfigMap);

impl RawConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a parsed document into a configuration.
    ///
    /// A `null` document (e.g. an empty YAML file) is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParseError` when the document is not a mapping.
    pub fn from_value(value: Value, source: &Path) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(CosbyError::ConfigParseError {
                path: source.to_path_buf(),
                message: format!("expected a mapping at the top level, found {}", type_name(&other)),
            }),
        }
    }

    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Insert or replace a top-level key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Remove a top-level key.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Check whether any of the reserved overlay keys are present.
    pub fn has_overlays(&self) -> bool {
        RESERVED_KEYS.iter().any(|key| self.0.contains_key(*key))
    }

    /// Borrow the underlying mapping.
    pub fn as_map(&self) -> &ConfigMap {
        &self.0
    }

    /// Consume into the underlying mapping.
    pub fn into_map(self) -> ConfigMap {
        self.0
    }

    /// Convert into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<ConfigMap> for RawConfig {
    fn from(map: ConfigMap) -> Self {
        Self(map)
    }
}

/// Flattened configuration ready for the bundler.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig(ConfigMap);

impl ResolvedConfig {
    pub(crate) fn from_map(map: ConfigMap) -> Self {
        Self(map)
    }

    /// Look up an option.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Check whether an option is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over options in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no options at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying mapping.
    pub fn as_map(&self) -> &ConfigMap {
        &self.0
    }

    pub(crate) fn as_map_mut(&mut self) -> &mut ConfigMap {
        &mut self.0
    }

    /// The output directory, if one is declared.
    pub fn outdir(&self) -> Option<&str> {
        self.0.get(OUTDIR_KEY).and_then(Value::as_str)
    }

    /// The single output file, if one is declared.
    pub fn outfile(&self) -> Option<&str> {
        self.0.get(OUTFILE_KEY).and_then(Value::as_str)
    }

    /// The directory relative paths in this configuration resolve against.
    pub fn working_dir(&self) -> Option<PathBuf> {
        self.0
            .get(ABS_WORKING_DIR_KEY)
            .and_then(Value::as_str)
            .map(PathBuf::from)
    }

    /// The output directory resolved against [`working_dir`](Self::working_dir).
    pub fn output_dir(&self) -> Option<PathBuf> {
        let outdir = Path::new(self.outdir()?);
        match self.working_dir() {
            Some(base) if outdir.is_relative() => Some(base.join(outdir)),
            _ => Some(outdir.to_path_buf()),
        }
    }

    /// The declared entry points, in whatever shape the document used.
    pub fn entry_points(&self) -> Option<&Value> {
        self.0.get(ENTRY_POINTS_KEY)
    }

    /// Whether at least one usable entry point is declared.
    ///
    /// Accepts an array holding a non-empty path or an `{in, out}` object with
    /// a non-empty `in`, a mapping of output names to non-empty inputs, or a
    /// single non-empty path. Blank paths and objects without `in` do not count.
    pub fn has_entry_points(&self) -> bool {
        match self.entry_points() {
            Some(Value::Array(items)) => items.iter().any(is_usable_entry),
            Some(Value::Object(map)) => map.values().any(is_non_empty_path),
            Some(path) => is_non_empty_path(path),
            None => false,
        }
    }

    /// Render as pretty JSON for debug output.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_default()
    }
}

fn is_non_empty_path(value: &Value) -> bool {
    value.as_str().is_some_and(|path| !path.trim().is_empty())
}

fn is_usable_entry(item: &Value) -> bool {
    match item {
        Value::Object(entry) => entry.get("in").is_some_and(is_non_empty_path),
        other => is_non_empty_path(other),
    }
}

/// Human-readable name of a JSON value's type.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}
