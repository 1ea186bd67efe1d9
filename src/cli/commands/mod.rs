//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which loads the
//! configuration once and then routes to [`BuildCommand`] or
//! [`WatchCommand`] depending on `--watch`.

pub mod build;
pub mod dispatcher;
pub mod watch;

pub use build::BuildCommand;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use watch::WatchCommand;
