//! Configuration loading, resolution, and validation for Cosby.
//!
//! This module handles all aspects of configuration:
//! - Document shapes in [`schema`]
//! - Source discovery and layering in [`loader`]
//! - Deep merging of layers in [`merger`]
//! - `extends` inheritance in [`extends`]
//! - `.env` injection in [`env_file`]
//! - `.esbuildrc` parsing in [`rc_file`]
//! - `${VAR}` interpolation in [`interpolation`]
//! - Overlay resolution in [`resolver`]
//! - Structural checks in [`validator`]
//!
//! # Example
//!
//! ```
//! use cosby::config::{resolve, Mode, RawConfig};
//! use serde_json::json;
//! use std::path::Path;
//!
//! let raw = RawConfig::from_value(
//!     json!({
//!         "entryPoints": ["src/index.ts"],
//!         "minify": false,
//!         "$production": { "minify": true }
//!     }),
//!     Path::new("esbuild.config.json"),
//! )
//! .unwrap();
//!
//! let config = resolve(&raw, None, Some(Mode::Production));
//! assert_eq!(config.get("minify"), Some(&json!(true)));
//! assert!(!config.contains_key("$production"));
//! ```
//!
//! # Configuration Sources
//!
//! Cosby looks for configuration in the working directory and merges it in
//! this order (later wins):
//! 1. The `esbuild` key of the nearest `package.json` (with `--package-json`)
//! 2. `.esbuildrc`
//! 3. `esbuild.config.{json,yaml,yml}` or `.config/esbuild.{json,yaml,yml}`

pub mod env_file;
pub mod extends;
pub mod interpolation;
pub mod loader;
pub mod merger;
pub mod options;
pub mod rc_file;
pub mod resolver;
pub mod schema;
pub mod validator;

pub use schema::{
    ConfigMap, RawConfig, ResolvedConfig, DEVELOPMENT_KEY, ENV_KEY, EXTENDS_KEY, PRODUCTION_KEY,
    RESERVED_KEYS, TEST_KEY,
};

pub use loader::{
    find_config_file, find_package_json, load_config, read_document, ConfigLoader, ConfigSources,
    LoadedConfig,
};

pub use merger::{deep_merge, merge_layers};

pub use resolver::{resolve, Mode};

pub use options::CliOptions;

pub use validator::{validate_entry_points, validate_overlays};

pub use interpolation::{
    expand_config, expand_string, expand_value, has_interpolation, is_variable_name, Segment,
};

pub use extends::{validate_extends, ExtendsResolver};

pub use env_file::{inject_env, load_env_file};

pub use rc_file::parse_rc;
