//! # Database Errors
//!
//! Errors raised by the execution collaborator. Handlers collapse all of
//! them into a generic 500; the detail is only ever logged.

use thiserror::Error;

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Clone, Error)]
pub enum DbError {
    /// Environment value present but unusable
    #[error("Invalid database configuration: {0}")]
    InvalidConfig(String),

    /// Pool could not be created
    #[error("Failed to connect to database: {0}")]
    Connect(String),

    /// `CREATE TABLE IF NOT EXISTS` failed
    #[error("Failed to ensure patient table: {0}")]
    Bootstrap(String),

    /// Statement failed in the engine (syntax, constraint, connectivity)
    #[error("Statement execution failed: {0}")]
    Execution(String),

    /// A placeholder had no value to bind
    #[error("Cannot bind parameter: {0}")]
    Bind(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = DbError::Execution("Table 'x' doesn't exist".to_string());
        assert_eq!(
            err.to_string(),
            "Statement execution failed: Table 'x' doesn't exist"
        );
    }

    #[test]
    fn test_bind_display() {
        let err = DbError::Bind("birthDate is undefined".to_string());
        assert_eq!(err.to_string(), "Cannot bind parameter: birthDate is undefined");
    }
}
