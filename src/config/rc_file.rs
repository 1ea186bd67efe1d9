//! `.esbuildrc` handling.
//!
//! The rc file uses the flat rc9 format shared by other JavaScript tooling:
//!
//! ```text
//! # Comment
//! bundle=true
//! outdir=dist
//! define.DEBUG=false
//! external[]=react
//! external[]=react-dom
//! ```
//!
//! Dotted keys nest, `key[]=value` appends to an array, and values are
//! decoded as JSON when they parse (`true`, `3`, `"text"`, `["a"]`) and kept
//! as plain strings otherwise. Lines that are not `key=value` are skipped.

use serde_json::Value;

use crate::config::schema::ConfigMap;

const ARRAY_SUFFIX: &str = "[]";

/// Parse rc9 content into a configuration document.
///
/// Never fails: malformed lines are skipped, and a later key overwrites an
/// earlier one, including a scalar sitting where a nested mapping is needed.
pub fn parse_rc(content: &str) -> Value {
    let mut flat = ConfigMap::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, raw)) = line.split_once('=') else {
            tracing::debug!("Skipping rc line {}: no '='", line_num + 1);
            continue;
        };

        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            tracing::debug!("Skipping rc line {}: bad key", line_num + 1);
            continue;
        }

        let value = decode_value(raw.trim());
        match key.strip_suffix(ARRAY_SUFFIX) {
            Some(name) => append(&mut flat, name, value),
            None => {
                flat.insert(key.to_string(), value);
            }
        }
    }

    let mut document = ConfigMap::new();
    for (key, value) in flat {
        insert_path(&mut document, &key, value);
    }
    Value::Object(document)
}

fn decode_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn append(flat: &mut ConfigMap, key: &str, value: Value) {
    let slot = flat
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    match slot {
        Value::Array(items) => items.push(value),
        other => *other = Value::Array(vec![other.take(), value]),
    }
}

fn insert_path(map: &mut ConfigMap, path: &str, value: Value) {
    let Some((head, rest)) = path.split_once('.') else {
        map.insert(path.to_string(), value);
        return;
    };

    let child = map
        .entry(head.to_string())
        .or_insert_with(|| Value::Object(ConfigMap::new()));
    if !child.is_object() {
        *child = Value::Object(ConfigMap::new());
    }
    if let Value::Object(child) = child {
        insert_path(child, rest, value);
    }
}
