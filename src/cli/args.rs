//! CLI argument definitions using clap
//!
//! Commands:
//! - patientdb serve [--host <host>] [--port <port>]
//! - patientdb check [--method get|post] <sql>

use clap::{Parser, Subcommand, ValueEnum};

use crate::validator::AllowedStatementSet;

/// patientdb - HTTP API for patient records
#[derive(Parser, Debug)]
#[command(name = "patientdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to MySQL and serve the HTTP API
    ///
    /// Database settings come from DB_HOST, DB_PORT, DB_USER, DB_PASSWORD,
    /// DB_DATABASE and DB_POOL_SIZE, in the environment or a .env file.
    Serve {
        /// Address to bind
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = crate::http_server::config::default_port())]
        port: u16,
    },

    /// Validate a statement without executing it
    Check {
        /// Request method whose allow-list applies
        #[arg(long, value_enum, default_value_t = QueryMethod::Get)]
        method: QueryMethod,

        /// Statement text
        sql: String,
    },
}

/// Methods accepted by `/api/query`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueryMethod {
    Get,
    Post,
}

impl QueryMethod {
    pub fn allowed(&self) -> AllowedStatementSet {
        match self {
            QueryMethod::Get => AllowedStatementSet::READ,
            QueryMethod::Post => AllowedStatementSet::WRITE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMethod::Get => "GET",
            QueryMethod::Post => "POST",
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
