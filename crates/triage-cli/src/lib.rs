//! Triage CLI library.
//!
//! Configuration profiles, command execution, output formatting and the
//! interactive intake session for the `triage` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
