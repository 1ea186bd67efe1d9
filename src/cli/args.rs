//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;

use crate::config::CliOptions;
use crate::error::Result;

const CONFIG_LOADER: &str = "Config Loader";

/// Cosby - Configuration-driven builds for esbuild.
#[derive(Debug, Parser)]
#[command(name = "cosby")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run in watch mode
    #[arg(short, long)]
    pub watch: bool,

    /// Clean outdir before build
    #[arg(short = 'C', long)]
    pub clean: bool,

    /// Print additional debug info
    #[arg(short, long)]
    pub debug: bool,

    /// Set current working directory
    #[arg(short, long, value_name = "PATH", help_heading = CONFIG_LOADER)]
    pub cwd: Option<PathBuf>,

    /// Load .env file
    #[arg(short = 'e', long, value_name = "ENV_FILE", help_heading = CONFIG_LOADER)]
    pub dotenv: Option<PathBuf>,

    /// Select the $env overlay to apply
    #[arg(long, value_name = "ENVIRONMENT", help_heading = CONFIG_LOADER)]
    pub env_name: Option<String>,

    /// Load config from nearest package.json file
    #[arg(short, long, help_heading = CONFIG_LOADER)]
    pub package_json: bool,
}

impl Cli {
    /// Convert parsed arguments into invocation options.
    ///
    /// `--cwd` is resolved against the process working directory.
    pub fn to_options(&self) -> Result<CliOptions> {
        let process_cwd = std::env::current_dir()?;
        let cwd = match &self.cwd {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => process_cwd.join(path),
            None => process_cwd,
        };

        Ok(CliOptions {
            cwd,
            watch: self.watch,
            clean: self.clean,
            debug: self.debug,
            env_name: self.env_name.clone(),
            dotenv: self.dotenv.clone(),
            package_json: self.package_json,
        })
    }
}
