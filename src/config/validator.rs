//! Configuration validation rules.
//!
//! - Overlay keys (`$development`, `$test`, `$production`, `$env.*`) must be mappings
//! - A resolved configuration must declare at least one entry point

use std::path::Path;

use serde_json::Value;

use crate::config::schema::{type_name, RawConfig, ResolvedConfig, ENV_KEY, RESERVED_KEYS};
use crate::error::{CosbyError, Result};

/// Check that every overlay in a raw configuration is a mapping.
///
/// Collects all problems into one error so they can be fixed at once.
pub fn validate_overlays(raw: &RawConfig) -> Result<()> {
    let mut problems = Vec::new();

    for key in RESERVED_KEYS {
        match raw.get(key) {
            None | Some(Value::Object(_)) => {}
            Some(other) => problems.push(format!(
                "'{}' must be a mapping, found {}",
                key,
                type_name(other)
            )),
        }
    }

    if let Some(Value::Object(envs)) = raw.get(ENV_KEY) {
        for (name, overlay) in envs {
            if !overlay.is_object() {
                problems.push(format!(
                    "'{}.{}' must be a mapping, found {}",
                    ENV_KEY,
                    name,
                    type_name(overlay)
                ));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(CosbyError::ConfigValidationError {
            message: problems.join("; "),
        })
    }
}

/// Check that a resolved configuration declares entry points.
///
/// # Errors
///
/// Returns `MissingEntryPoints` naming the configuration source.
pub fn validate_entry_points(config: &ResolvedConfig, source: &Path) -> Result<()> {
    if config.has_entry_points() {
        Ok(())
    } else {
        Err(CosbyError::MissingEntryPoints {
            path: source.to_path_buf(),
        })
    }
}
