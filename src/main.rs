//! Cosby CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use cosby::bundler::EsbuildCli;
use cosby::cli::{Cli, CommandDispatcher};
use cosby::lifecycle::SystemClock;
use cosby::ui::{Reporter, TerminalReporter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("cosby=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cosby=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Cosby starting with args: {:?}", cli);

    let mut reporter = TerminalReporter::new();

    let options = match cli.to_options() {
        Ok(options) => options,
        Err(e) => {
            reporter.error(&format!("Error: {}", e));
            return ExitCode::from(1);
        }
    };

    let bundler = EsbuildCli::locate(&options.cwd);
    let dispatcher = CommandDispatcher::new(Box::new(bundler), Arc::new(SystemClock));

    match dispatcher.dispatch(&options, &mut reporter) {
        Ok(result) => ExitCode::from(result.exit_code),
        Err(e) => {
            reporter.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
