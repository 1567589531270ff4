//! CLI command implementations

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::database::{load_dotenv, DatabaseConfig, MySqlExecutor};
use crate::http_server::{AppState, HttpServer, HttpServerConfig};
use crate::observability::{log_event_with_fields, Event};
use crate::validator::{check_statement, LexicalClassifier, ValidationResult};

use super::args::{Command, QueryMethod};
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Load `.env`, parse arguments and run the selected command.
///
/// `.env` is read before parsing so `HOST` and `PORT` from the file reach
/// clap as well as the `DB_*` settings.
pub fn run() -> CliResult<()> {
    let env_file = load_dotenv()?;
    let cli = super::args::Cli::parse_args();
    run_command(cli.command, env_file)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, env_file: Option<PathBuf>) -> CliResult<()> {
    match cmd {
        Command::Serve { host, port } => serve(HttpServerConfig::new(host, port), env_file),
        Command::Check { method, sql } => check(method, &sql),
    }
}

/// Connect the pool, bootstrap the table, then serve until killed.
///
/// The pool is created once here and handed to the router; nothing else
/// owns it.
pub fn serve(http_config: HttpServerConfig, env_file: Option<PathBuf>) -> CliResult<()> {
    let db_config = DatabaseConfig::from_env()?;
    let env_file = env_file
        .map(|path| path.display().to_string())
        .unwrap_or_default();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("database", db_config.display_target().as_str()),
            ("env_file", env_file.as_str()),
            ("listen", http_config.socket_addr().as_str()),
        ],
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let executor = MySqlExecutor::connect(&db_config).await.map_err(|e| {
            let detail = e.to_string();
            log_event_with_fields(Event::StartupFailed, &[("error", detail.as_str())]);
            CliError::from(e)
        })?;

        let state = Arc::new(AppState::new(Arc::new(executor)));
        HttpServer::new(http_config, state)
            .start()
            .await
            .map_err(|e| CliError::io_error(format!("HTTP server failed: {}", e)))
    })
}

/// Outcome printed by `check`
#[derive(Debug, Serialize)]
pub struct CheckReport<'a> {
    pub method: &'static str,
    pub sql: &'a str,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl<'a> CheckReport<'a> {
    pub fn new(method: QueryMethod, sql: &'a str, result: ValidationResult) -> Self {
        Self {
            method: method.as_str(),
            sql,
            accepted: result.is_accepted(),
            reason: result.reason().map(|r| r.to_string()),
        }
    }
}

/// Run the validator offline and print the decision.
///
/// A rejected statement is reported and then returned as an error so the
/// exit status reflects it.
pub fn check(method: QueryMethod, sql: &str) -> CliResult<()> {
    let result = check_statement(Some(sql), &method.allowed(), &LexicalClassifier::new());
    let report = CheckReport::new(method, sql, result);
    write_json(&report)?;

    match result {
        ValidationResult::Accepted => Ok(()),
        ValidationResult::Rejected(reason) => Err(CliError::rejected(reason.to_string())),
    }
}
