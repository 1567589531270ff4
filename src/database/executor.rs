//! Execution collaborator seam
//!
//! Handlers only see [`StatementExecutor`]; the MySQL pool and the
//! in-memory recorder both sit behind it.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::errors::DbResult;

/// One result row, keyed by column name in select order
pub type Row = Map<String, Value>;

/// Bound parameter for a `?` placeholder.
///
/// `Int` also carries JSON booleans as 0/1.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    Date(NaiveDate),
    Int(i64),
    Null,
}

/// Runs statements that have already passed validation
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Execute `statement` with positional `params`.
    ///
    /// Returns the produced rows; statements that produce none return an
    /// empty vector. Implementations ensure the `patient` table exists
    /// before running anything.
    async fn execute(&self, statement: &str, params: &[Param]) -> DbResult<Vec<Row>>;
}
