//! Deep merge algorithm for layered configuration sources.
//!
//! Configuration sources (package.json key, rc file, config file, and the
//! parents they `extends`) are layered where later layers override earlier
//! ones. This is distinct from environment resolution, which is shallow.
//!
//! # Merge Rules
//!
//! - Objects are merged recursively
//! - Arrays are replaced entirely (not merged)
//! - Null values in overlay delete the corresponding key from base
//! - Scalars in overlay replace scalars in base

use serde_json::Value;

/// Deep merge two JSON values.
///
/// Later values override earlier values at the point of conflict.
///
/// # Arguments
///
/// * `base` - The lower-priority layer
/// * `overlay` - The higher-priority layer
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut result = base_map.clone();

            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    result.shift_remove(key);
                } else if let Some(base_value) = base_map.get(key) {
                    result.insert(key.clone(), deep_merge(base_value, overlay_value));
                } else {
                    result.insert(key.clone(), overlay_value.clone());
                }
            }

            Value::Object(result)
        }

        (_, overlay) => overlay.clone(),
    }
}

/// Merge multiple layers in order (later overrides earlier).
pub fn merge_layers(layers: &[Value]) -> Value {
    layers
        .iter()
        .fold(Value::Object(Default::default()), |acc, layer| {
            deep_merge(&acc, layer)
        })
}
