//! Configuration inheritance resolution.
//!
//! This module handles the `extends:` key, which lets a configuration
//! source inherit from one or more parent sources merged beneath it.
//!
//! A target may be:
//! - a relative or absolute path to a file (extension optional)
//! - a path to a directory containing an `esbuild.config.*` file
//! - a bare package name, looked up under the nearest `node_modules`

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::loader::{find_config_file, read_document};
use super::merger::deep_merge;
use super::schema::{type_name, EXTENDS_KEY};
use crate::error::{CosbyError, Result};

/// Extensions tried when an extends target names a file without one.
const EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Resolves configuration inheritance chains.
#[derive(Debug, Clone)]
pub struct ExtendsResolver {
    max_depth: usize,
}

impl ExtendsResolver {
    /// Create a resolver with default settings.
    pub fn new() -> Self {
        Self { max_depth: 10 }
    }

    /// Create a resolver with custom max depth.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Get the maximum extends depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Resolve all `extends` references of a document loaded from `source`.
    ///
    /// Parents are merged in listed order, then the document itself is
    /// merged on top. The returned document carries no `extends` key.
    pub fn resolve(&self, document: Value, source: &Path) -> Result<Value> {
        let mut chain = vec![canonical(source)];
        self.resolve_with_chain(document, source, &mut chain, 0)
    }

    fn resolve_with_chain(
        &self,
        mut document: Value,
        source: &Path,
        chain: &mut Vec<PathBuf>,
        depth: usize,
    ) -> Result<Value> {
        let targets = match document.as_object_mut() {
            Some(map) => match map.shift_remove(EXTENDS_KEY) {
                Some(value) => extends_targets(&value)?,
                None => return Ok(document),
            },
            None => return Ok(document),
        };

        if targets.is_empty() {
            return Ok(document);
        }

        if depth >= self.max_depth {
            return Err(CosbyError::ExtendsTooDeep {
                max_depth: self.max_depth,
            });
        }

        let base_dir = source.parent().unwrap_or_else(|| Path::new("."));
        let mut merged = Value::Object(Default::default());

        for target in targets {
            let parent_path = resolve_target(&target, base_dir)?;
            let key = canonical(&parent_path);
            if chain.contains(&key) {
                return Err(CosbyError::ExtendsCycle { path: parent_path });
            }

            tracing::debug!(
                "{} extends {}",
                source.display(),
                parent_path.display()
            );

            chain.push(key);
            let parent = read_document(&parent_path)?;
            let resolved_parent =
                self.resolve_with_chain(parent, &parent_path, chain, depth + 1)?;
            chain.pop();

            merged = deep_merge(&merged, &resolved_parent);
        }

        Ok(deep_merge(&merged, &document))
    }
}

impl Default for ExtendsResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the list of targets from an `extends` value.
fn extends_targets(value: &Value) -> Result<Vec<String>> {
    let targets = match value {
        Value::Null => Vec::new(),
        Value::String(target) => vec![target.clone()],
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    CosbyError::ConfigValidationError {
                        message: format!(
                            "'extends' entries must be strings, found {}",
                            type_name(item)
                        ),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?,
        other => {
            return Err(CosbyError::ConfigValidationError {
                message: format!(
                    "'extends' must be a string or a list of strings, found {}",
                    type_name(other)
                ),
            })
        }
    };

    for target in &targets {
        validate_extends(target)?;
    }

    Ok(targets)
}

/// Validate a single extends target.
pub fn validate_extends(target: &str) -> Result<()> {
    if target.trim().is_empty() {
        return Err(CosbyError::ConfigValidationError {
            message: "Extends target cannot be empty".to_string(),
        });
    }
    if target.contains("://") || target.starts_with("gh:") || target.starts_with("github:") {
        return Err(CosbyError::ConfigValidationError {
            message: format!("Remote extends are not supported: {}", target),
        });
    }
    Ok(())
}

/// Turn an extends target into the path of a configuration file.
fn resolve_target(target: &str, base_dir: &Path) -> Result<PathBuf> {
    let candidate = if is_path_like(target) {
        base_dir.join(target)
    } else {
        find_package_dir(target, base_dir).ok_or_else(|| CosbyError::ConfigValidationError {
            message: format!(
                "Cannot find package '{}' for extends in {}",
                target,
                base_dir.display()
            ),
        })?
    };

    if candidate.is_dir() {
        return find_config_file(&candidate).ok_or_else(|| CosbyError::ConfigValidationError {
            message: format!("No configuration file found in {}", candidate.display()),
        });
    }

    if candidate.is_file() {
        return Ok(candidate);
    }

    for ext in EXTENSIONS {
        let mut with_ext = candidate.clone().into_os_string();
        with_ext.push(".");
        with_ext.push(ext);
        let with_ext = PathBuf::from(with_ext);
        if with_ext.is_file() {
            return Ok(with_ext);
        }
    }

    Err(CosbyError::ConfigValidationError {
        message: format!(
            "Cannot resolve extends '{}' from {}",
            target,
            base_dir.display()
        ),
    })
}

fn is_path_like(target: &str) -> bool {
    target.starts_with("./")
        || target.starts_with("../")
        || target == "."
        || target == ".."
        || Path::new(target).is_absolute()
}

/// Find `node_modules/<name>` walking up from `start`.
fn find_package_dir(name: &str, start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join("node_modules").join(name))
        .find(|candidate| candidate.exists())
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
