//! Cosby - Configuration-driven builds for esbuild.
//!
//! Cosby finds an esbuild configuration for a project, flattens its
//! environment overlays (`$env`, `$development`, `$test`, `$production`),
//! and runs a timed one-shot build or a rebuild-on-change watch session.
//!
//! # Modules
//!
//! - [`bundler`] - Bundler abstraction and the esbuild CLI backend
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration discovery, resolution, and validation
//! - [`error`] - Error types and result aliases
//! - [`lifecycle`] - Build and watch lifecycle controllers
//! - [`ui`] - Operator-facing reporting
//!
//! # Example
//!
//! ```
//! use cosby::bundler::MockBundler;
//! use cosby::config::{resolve, RawConfig};
//! use cosby::lifecycle::{run_build, ManualClock};
//! use cosby::ui::MockReporter;
//! use serde_json::json;
//! use std::path::Path;
//! use std::time::Duration;
//!
//! let raw = RawConfig::from_value(
//!     json!({"entryPoints": ["src/index.ts"], "$env": {"ci": {"minify": true}}}),
//!     Path::new("esbuild.config.json"),
//! )
//! .unwrap();
//! let config = resolve(&raw, Some("ci"), None);
//!
//! let bundler = MockBundler::new();
//! let mut reporter = MockReporter::new();
//! let clock = ManualClock::with_ticks([Duration::ZERO, Duration::from_millis(2500)]);
//!
//! run_build(&bundler, &mut reporter, &clock, &config, false).unwrap();
//! assert!(reporter.has_success("Build completed in 2.500s."));
//! ```

pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod ui;

pub use error::{CosbyError, Result};
