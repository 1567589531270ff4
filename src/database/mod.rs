//! # Database Module
//!
//! The execution collaborator: runs validated statements against the
//! `patient` table and returns rows as JSON objects.
//!
//! - [`MySqlExecutor`] - sqlx MySQL pool, created once at startup
//! - [`MemoryExecutor`] - recording stand-in for tests

pub mod config;
pub mod errors;
pub mod executor;
pub mod memory;
pub mod mysql;
pub mod patient;

pub use config::{load_dotenv, load_env_file, DatabaseConfig};
pub use errors::{DbError, DbResult};
pub use executor::{Param, Row, StatementExecutor};
pub use memory::{ExecutedStatement, MemoryExecutor};
pub use mysql::{MySqlExecutor, CREATE_PATIENT_TABLE};
pub use patient::{PatientBatch, PatientRecord, INSERT_PATIENT};
