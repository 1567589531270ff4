//! CLI module for patientdb
//!
//! - serve: connect to MySQL and run the HTTP API
//! - check: validate a statement offline

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, QueryMethod};
pub use commands::{check, run, run_command, serve, CheckReport};
pub use errors::{CliError, CliErrorCode, CliResult};
