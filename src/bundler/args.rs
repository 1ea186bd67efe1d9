//! Translation of resolved configuration into esbuild CLI arguments.
//!
//! Configuration keys use esbuild's JS API names (`entryPoints`, `outdir`,
//! `sourcemap`, ...). The CLI spells the same options in kebab-case and has a
//! few distinct shapes for lists and maps:
//!
//! | Value                    | Argument                    |
//! |--------------------------|-----------------------------|
//! | `true`                   | `--bundle`                  |
//! | `false` / `null`         | omitted                     |
//! | scalar                   | `--format=esm`              |
//! | list option              | `--external:fs` (repeated)  |
//! | comma option             | `--target=es2020,node18`    |
//! | keyed map                | `--define:DEBUG=false`      |
//!
//! Entry points become positional arguments.

use heck::ToKebabCase;
use serde_json::Value;

use crate::config::schema::{ABS_WORKING_DIR_KEY, ENTRY_POINTS_KEY};
use crate::config::ResolvedConfig;

/// Options passed as one `--flag:item` argument per element.
const LIST_OPTIONS: &[&str] = &["external", "inject", "pure", "drop"];

/// Options passed as a single comma-separated `--flag=a,b`.
const COMMA_OPTIONS: &[&str] = &[
    "target",
    "resolveExtensions",
    "mainFields",
    "conditions",
    "dropLabels",
];

/// Options passed as one `--flag:key=value` argument per entry.
const KEYED_OPTIONS: &[&str] = &[
    "define",
    "loader",
    "banner",
    "footer",
    "alias",
    "outExtension",
    "supported",
    "logOverride",
];

/// Options that only exist in the JS API.
const JS_ONLY_OPTIONS: &[&str] = &["plugins", "write", "stdin", "watch"];

/// Options where `false` must be passed explicitly.
const EXPLICIT_FALSE_OPTIONS: &[&str] = &["treeShaking"];

/// Build the argument list for a resolved configuration.
///
/// Entry points come first, followed by one or more arguments per option in
/// document order. `absWorkingDir` is not translated; the caller runs the
/// process in that directory instead.
///
/// # Example
///
/// ```
/// use cosby::bundler::build_args;
/// use cosby::config::{resolve, RawConfig};
/// use serde_json::json;
/// use std::path::Path;
///
/// let raw = RawConfig::from_value(
///     json!({"entryPoints": ["src/index.ts"], "bundle": true, "outdir": "dist"}),
///     Path::new("esbuild.config.json"),
/// )
/// .unwrap();
///
/// let args = build_args(&resolve(&raw, None, None));
/// assert_eq!(args, vec!["src/index.ts", "--bundle", "--outdir=dist"]);
/// ```
pub fn build_args(config: &ResolvedConfig) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(entries) = config.entry_points() {
        push_entry_points(&mut args, entries);
    }

    for (key, value) in config.iter() {
        let key = key.as_str();
        if key == ENTRY_POINTS_KEY || key == ABS_WORKING_DIR_KEY {
            continue;
        }
        if JS_ONLY_OPTIONS.contains(&key) {
            tracing::debug!("Ignoring option '{}', which the esbuild CLI does not support", key);
            continue;
        }
        push_option(&mut args, key, value);
    }

    args
}

fn push_entry_points(args: &mut Vec<String>, entries: &Value) {
    match entries {
        Value::String(path) => args.push(path.clone()),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(path) => args.push(path.clone()),
                    Value::Object(entry) => {
                        let input = entry.get("in").and_then(Value::as_str);
                        let output = entry.get("out").and_then(Value::as_str);
                        match (output, input) {
                            (Some(out), Some(input)) => args.push(format!("{}={}", out, input)),
                            (None, Some(input)) => args.push(input.to_string()),
                            _ => tracing::debug!("Skipping malformed entry point {}", item),
                        }
                    }
                    other => tracing::debug!("Skipping malformed entry point {}", other),
                }
            }
        }
        Value::Object(map) => {
            for (out, input) in map {
                args.push(format!("{}={}", out, scalar(input)));
            }
        }
        other => tracing::debug!("Skipping malformed entry points {}", other),
    }
}

fn push_option(args: &mut Vec<String>, key: &str, value: &Value) {
    let flag = key.to_kebab_case();

    if LIST_OPTIONS.contains(&key) {
        for item in as_list(value) {
            args.push(format!("--{}:{}", flag, scalar(item)));
        }
        return;
    }

    if COMMA_OPTIONS.contains(&key) {
        let joined = as_list(value)
            .into_iter()
            .map(scalar)
            .collect::<Vec<_>>()
            .join(",");
        args.push(format!("--{}={}", flag, joined));
        return;
    }

    if KEYED_OPTIONS.contains(&key) {
        if let Value::Object(map) = value {
            for (name, item) in map {
                args.push(format!("--{}:{}={}", flag, name, scalar(item)));
            }
        } else {
            tracing::debug!("Expected a mapping for '{}', skipping", key);
        }
        return;
    }

    match value {
        Value::Null => {}
        Value::Bool(true) => args.push(format!("--{}", flag)),
        Value::Bool(false) => {
            if EXPLICIT_FALSE_OPTIONS.contains(&key) {
                args.push(format!("--{}=false", flag));
            }
        }
        other => args.push(format!("--{}={}", flag, scalar(other))),
    }
}

fn as_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Render a value the way the CLI expects it after `=`.
///
/// Strings are passed bare; everything else (numbers, objects such as an
/// inline `tsconfigRaw`) as compact JSON.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
