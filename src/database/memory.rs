//! In-memory execution collaborator
//!
//! Records every statement it is handed and answers with scripted rows.
//! Lets the routes be exercised without a MySQL server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::errors::{DbError, DbResult};
use super::executor::{Param, Row, StatementExecutor};

/// A statement that reached the executor
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    pub statement: String,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum FailureMode {
    #[default]
    Never,
    OnCall(usize),
    Always,
}

#[derive(Debug, Default)]
pub struct MemoryExecutor {
    executed: Mutex<Vec<ExecutedStatement>>,
    rows: Vec<Row>,
    failure: FailureMode,
    calls: AtomicUsize,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `rows` from every successful call
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    /// Fail the call with this zero-based index
    pub fn failing_on_call(mut self, index: usize) -> Self {
        self.failure = FailureMode::OnCall(index);
        self
    }

    /// Fail every call
    pub fn always_failing() -> Self {
        Self {
            failure: FailureMode::Always,
            ..Self::default()
        }
    }

    /// Statements that executed successfully, in call order
    pub fn executed(&self) -> Vec<ExecutedStatement> {
        self.executed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of calls attempted, failed ones included
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn should_fail(&self, index: usize) -> bool {
        match self.failure {
            FailureMode::Never => false,
            FailureMode::OnCall(target) => target == index,
            FailureMode::Always => true,
        }
    }
}

#[async_trait]
impl StatementExecutor for MemoryExecutor {
    async fn execute(&self, statement: &str, params: &[Param]) -> DbResult<Vec<Row>> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);

        if self.should_fail(index) {
            return Err(DbError::Execution(format!(
                "scripted failure on call {}",
                index
            )));
        }

        self.executed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(ExecutedStatement {
                statement: statement.to_string(),
                params: params.to_vec(),
            });

        Ok(self.rows.clone())
    }
}
