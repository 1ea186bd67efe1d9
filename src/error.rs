//! Error types for Cosby operations.
//!
//! This module defines [`CosbyError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration errors (`ConfigNotFound`, `MissingEntryPoints`, ...) always
//!   propagate to the caller, which decides the exit status
//! - `BuildFailure` is swallowed at the lifecycle boundary, since the bundler
//!   has already printed its own diagnostics
//! - Use `anyhow::Error` (via `CosbyError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Cosby operations.
#[derive(Debug, Error)]
pub enum CosbyError {
    /// No configuration source was located in the search path.
    #[error("No configuration found in {cwd}")]
    ConfigNotFound { cwd: PathBuf },

    /// A configuration was resolved but declares no entry points.
    #[error("Configuration at {path} declares no entry points")]
    MissingEntryPoints { path: PathBuf },

    /// Failed to parse a configuration source.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// An `extends` chain refers back to a file already being loaded.
    #[error("Circular extends detected: {path}")]
    ExtendsCycle { path: PathBuf },

    /// An `extends` chain is nested deeper than allowed.
    #[error("Config extends depth exceeds maximum of {max_depth}")]
    ExtendsTooDeep { max_depth: usize },

    /// The bundler ran and reported a failed build.
    #[error("Build failed with exit code {code:?}")]
    BuildFailure { code: Option<i32> },

    /// The bundler executable could not be launched.
    #[error("Unable to run bundler '{program}': {message}")]
    BundlerUnavailable { program: String, message: String },

    /// The file watcher backing a watch session failed.
    #[error("File watcher error: {message}")]
    Watch { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of a [`CosbyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration could not be located, parsed, or validated.
    Config,
    /// The bundler reported a failed build.
    Build,
    /// The bundler or its watcher could not be started.
    Bundler,
    /// Anything else (IO, wrapped errors).
    Internal,
}

impl CosbyError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigNotFound { .. }
            | Self::MissingEntryPoints { .. }
            | Self::ConfigParseError { .. }
            | Self::ConfigValidationError { .. }
            | Self::ExtendsCycle { .. }
            | Self::ExtendsTooDeep { .. } => ErrorKind::Config,
            Self::BuildFailure { .. } => ErrorKind::Build,
            Self::BundlerUnavailable { .. } | Self::Watch { .. } => ErrorKind::Bundler,
            Self::Io(_) | Self::Other(_) => ErrorKind::Internal,
        }
    }
}

impl From<notify::Error> for CosbyError {
    fn from(err: notify::Error) -> Self {
        Self::Watch {
            message: err.to_string(),
        }
    }
}

/// Result type alias for Cosby operations.
pub type Result<T> = std::result::Result<T, CosbyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_cwd() {
        let err = CosbyError::ConfigNotFound {
            cwd: PathBuf::from("/work/app"),
        };
        assert!(err.to_string().contains("/work/app"));
    }

    #[test]
    fn missing_entry_points_displays_path() {
        let err = CosbyError::MissingEntryPoints {
            path: PathBuf::from("esbuild.config.json"),
        };
        let msg = err.to_string();
        assert!(msg.contains("esbuild.config.json"));
        assert!(msg.contains("no entry points"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = CosbyError::ConfigParseError {
            path: PathBuf::from("/esbuild.config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/esbuild.config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn build_failure_displays_code() {
        let err = CosbyError::BuildFailure { code: Some(1) };
        assert!(err.to_string().contains("1"));
    }

    #[test]
    fn config_errors_are_distinct_from_build_failures() {
        let not_found = CosbyError::ConfigNotFound {
            cwd: PathBuf::from("."),
        };
        let no_entries = CosbyError::MissingEntryPoints {
            path: PathBuf::from("."),
        };
        let failed = CosbyError::BuildFailure { code: Some(1) };

        assert_eq!(not_found.kind(), ErrorKind::Config);
        assert_eq!(no_entries.kind(), ErrorKind::Config);
        assert_eq!(failed.kind(), ErrorKind::Build);
        assert_ne!(not_found.to_string(), no_entries.to_string());
    }

    #[test]
    fn bundler_unavailable_is_not_a_build_failure() {
        let err = CosbyError::BundlerUnavailable {
            program: "esbuild".into(),
            message: "not found".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Bundler);
        assert!(err.to_string().contains("esbuild"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CosbyError = io_err.into();
        assert!(matches!(err, CosbyError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(CosbyError::ConfigValidationError {
                message: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
