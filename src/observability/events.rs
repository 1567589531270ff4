//! Observable events
//!
//! Every log line carries one of these as its `event` field.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration read from the environment
    ConfigLoaded,
    /// HTTP server is about to bind
    ServerStarting,
    /// Listener bound, accepting requests
    Serving,
    /// Pool or listener could not be set up (FATAL)
    StartupFailed,

    // Storage
    /// Connection pool created
    PoolCreated,
    /// `patient` table exists
    TableEnsured,

    // Requests
    /// Request refused with a 4xx before touching the database
    RequestRejected,
    /// Read query returned rows
    QueryExecuted,
    /// Write statement executed
    WriteExecuted,
    /// Every entry of a batch was inserted
    BatchInsertComplete,
    /// Database collaborator failed
    ExecutionFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ServerStarting => "SERVER_STARTING",
            Event::Serving => "SERVING",
            Event::StartupFailed => "STARTUP_FAILED",
            Event::PoolCreated => "POOL_CREATED",
            Event::TableEnsured => "TABLE_ENSURED",
            Event::RequestRejected => "REQUEST_REJECTED",
            Event::QueryExecuted => "QUERY_COMPLETE",
            Event::WriteExecuted => "WRITE_COMPLETE",
            Event::BatchInsertComplete => "BATCH_INSERT_COMPLETE",
            Event::ExecutionFailed => "EXECUTION_FAILED",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StartupFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
