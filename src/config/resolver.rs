//! Environment resolution.
//!
//! Flattens a [`RawConfig`] into a [`ResolvedConfig`] in three steps:
//!
//! 1. The base layer is the document minus the overlay keys
//! 2. `$env.<name>` is shallow-merged over the base (when a name is given)
//! 3. The mode overlay (`$development`, `$test`, `$production`) is
//!    shallow-merged over that result (when a mode is given)
//!
//! Finally `extends` and the overlay keys are stripped. Merging is shallow:
//! an overlay replaces a nested value such as `define` wholesale.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use super::schema::{
    ConfigMap, RawConfig, ResolvedConfig, DEVELOPMENT_KEY, ENV_KEY, EXTENDS_KEY, PRODUCTION_KEY,
    RESERVED_KEYS, TEST_KEY,
};

/// Execution mode selecting one of the fixed overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Selects `$development`.
    Development,
    /// Selects `$test`.
    Test,
    /// Selects `$production`.
    Production,
}

impl Mode {
    /// The overlay key this mode selects.
    pub fn overlay_key(self) -> &'static str {
        match self {
            Self::Development => DEVELOPMENT_KEY,
            Self::Test => TEST_KEY,
            Self::Production => PRODUCTION_KEY,
        }
    }

    /// Read the mode from `NODE_ENV`.
    ///
    /// Unset or unrecognised values select no mode.
    pub fn from_node_env() -> Option<Self> {
        std::env::var("NODE_ENV").ok()?.parse().ok()
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!("unknown mode: {}", s)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Test => write!(f, "test"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Resolve a raw configuration for an optional environment name and mode.
///
/// A missing `$env` entry for `env_name` is not an error; the base layer
/// simply passes through. Overlays that are not mappings are ignored.
///
/// # Example
///
/// ```
/// use cosby::config::{resolve, Mode, RawConfig};
/// use serde_json::json;
///
/// let raw: RawConfig = serde_json::from_value(json!({
///     "outdir": "B",
///     "bundle": true,
///     "$env": { "staging": { "outdir": "A" } }
/// })).unwrap();
///
/// let resolved = resolve(&raw, Some("staging"), None);
/// assert_eq!(resolved.outdir(), Some("A"));
/// assert_eq!(resolved.get("bundle"), Some(&json!(true)));
/// assert!(!resolved.contains_key("$env"));
/// ```
pub fn resolve(raw: &RawConfig, env_name: Option<&str>, mode: Option<Mode>) -> ResolvedConfig {
    let source = raw.as_map();

    let mut result: ConfigMap = source
        .iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if let Some(name) = env_name {
        let overlay = source
            .get(ENV_KEY)
            .and_then(Value::as_object)
            .and_then(|envs| envs.get(name));
        match overlay {
            Some(Value::Object(overlay)) => {
                tracing::debug!("Applying $env.{} overlay", name);
                shallow_merge(&mut result, overlay);
            }
            Some(other) => {
                tracing::warn!("Ignoring $env.{}: expected a mapping, found {}", name, other);
            }
            None => tracing::debug!("No $env.{} overlay defined", name),
        }
    }

    if let Some(mode) = mode {
        if let Some(overlay) = source.get(mode.overlay_key()).and_then(Value::as_object) {
            tracing::debug!("Applying {} overlay", mode.overlay_key());
            shallow_merge(&mut result, overlay);
        }
    }

    result.retain(|key, _| key != EXTENDS_KEY && !RESERVED_KEYS.contains(&key.as_str()));

    ResolvedConfig::from_map(result)
}

/// Copy every top-level key of `overlay` into `base`, replacing on conflict.
fn shallow_merge(base: &mut ConfigMap, overlay: &ConfigMap) {
    for (key, value) in overlay {
        base.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawConfig {
        serde_json::from_value(value).unwrap()
    }

    fn as_value(config: &ResolvedConfig) -> Value {
        serde_json::to_value(config).unwrap()
    }

    #[test]
    fn config_without_overlays_is_identity_minus_extends() {
        let input = raw(json!({
            "entryPoints": ["src/index.ts"],
            "bundle": true,
            "extends": "../base",
            "define": {"DEBUG": "false"}
        }));

        for env in [None, Some("staging"), Some("anything")] {
            let resolved = resolve(&input, env, Some(Mode::Production));
            assert_eq!(
                as_value(&resolved),
                json!({
                    "entryPoints": ["src/index.ts"],
                    "bundle": true,
                    "define": {"DEBUG": "false"}
                })
            );
        }
    }

    #[test]
    fn env_overlay_wins_and_keeps_other_keys() {
        let input = raw(json!({
            "outdir": "B",
            "bundle": true,
            "$env": {"staging": {"outdir": "A"}}
        }));

        let resolved = resolve(&input, Some("staging"), None);

        assert_eq!(as_value(&resolved), json!({"outdir": "A", "bundle": true}));
    }

    #[test]
    fn env_overlay_adds_new_keys() {
        let input = raw(json!({
            "outdir": "dist",
            "$env": {"staging": {"sourcemap": true}}
        }));

        let resolved = resolve(&input, Some("staging"), None);

        assert_eq!(resolved.get("sourcemap"), Some(&json!(true)));
        assert_eq!(resolved.outdir(), Some("dist"));
    }

    #[test]
    fn missing_env_entry_falls_through() {
        let input = raw(json!({
            "outdir": "B",
            "$env": {"staging": {"outdir": "A"}}
        }));

        let resolved = resolve(&input, Some("qa"), None);

        assert_eq!(as_value(&resolved), json!({"outdir": "B"}));
    }

    #[test]
    fn env_overlay_ignored_without_env_name() {
        let input = raw(json!({
            "outdir": "B",
            "$env": {"staging": {"outdir": "A"}}
        }));

        let resolved = resolve(&input, None, None);

        assert_eq!(resolved.outdir(), Some("B"));
    }

    #[test]
    fn mode_overlay_applies_after_env_overlay() {
        let input = raw(json!({
            "minify": false,
            "$env": {"staging": {"minify": "env"}},
            "$production": {"minify": true}
        }));

        let resolved = resolve(&input, Some("staging"), Some(Mode::Production));

        assert_eq!(resolved.get("minify"), Some(&json!(true)));
    }

    #[test]
    fn only_selected_mode_overlay_applies() {
        let input = raw(json!({
            "sourcemap": false,
            "$development": {"sourcemap": true},
            "$test": {"sourcemap": "inline"},
            "$production": {"minify": true}
        }));

        let dev = resolve(&input, None, Some(Mode::Development));
        assert_eq!(as_value(&dev), json!({"sourcemap": true}));

        let test = resolve(&input, None, Some(Mode::Test));
        assert_eq!(as_value(&test), json!({"sourcemap": "inline"}));

        let none = resolve(&input, None, None);
        assert_eq!(as_value(&none), json!({"sourcemap": false}));
    }

    #[test]
    fn nested_objects_are_replaced_not_merged() {
        let input = raw(json!({
            "define": {"A": "1", "B": "2"},
            "$production": {"define": {"B": "3"}}
        }));

        let resolved = resolve(&input, None, Some(Mode::Production));

        assert_eq!(resolved.get("define"), Some(&json!({"B": "3"})));
    }

    #[test]
    fn reserved_keys_never_survive() {
        let input = raw(json!({
            "outdir": "dist",
            "extends": "./base.json",
            "$development": {"extends": "./dev.json", "$test": {"x": 1}},
            "$test": {},
            "$production": {"$env": {}},
            "$env": {"staging": {"$production": {}, "extends": "x"}}
        }));

        for mode in [None, Some(Mode::Development), Some(Mode::Test), Some(Mode::Production)] {
            let resolved = resolve(&input, Some("staging"), mode);
            for key in ["$development", "$test", "$production", "$env", "extends"] {
                assert!(!resolved.contains_key(key), "{} survived with {:?}", key, mode);
            }
            assert_eq!(resolved.outdir(), Some("dist"));
        }
    }

    #[test]
    fn non_mapping_overlays_are_ignored() {
        let input = raw(json!({
            "outdir": "dist",
            "$env": {"staging": "not a mapping"},
            "$production": ["nope"]
        }));

        let resolved = resolve(&input, Some("staging"), Some(Mode::Production));

        assert_eq!(as_value(&resolved), json!({"outdir": "dist"}));
    }

    #[test]
    fn resolve_does_not_mutate_input() {
        let input = raw(json!({"outdir": "B", "$env": {"staging": {"outdir": "A"}}}));
        let before = input.clone();

        let _ = resolve(&input, Some("staging"), None);

        assert_eq!(input, before);
    }

    #[test]
    fn mode_overlay_keys() {
        assert_eq!(Mode::Development.overlay_key(), "$development");
        assert_eq!(Mode::Test.overlay_key(), "$test");
        assert_eq!(Mode::Production.overlay_key(), "$production");
    }

    #[test]
    fn mode_from_str() {
        assert_eq!("production".parse::<Mode>(), Ok(Mode::Production));
        assert_eq!("Development".parse::<Mode>(), Ok(Mode::Development));
        assert_eq!("test".parse::<Mode>(), Ok(Mode::Test));
        assert!("staging".parse::<Mode>().is_err());
    }

    #[test]
    fn mode_display() {
        assert_eq!(Mode::Production.to_string(), "production");
    }
}
