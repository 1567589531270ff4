//! patientdb - HTTP API for inserting and querying patient records
//!
//! Requests are dispatched by [`http_server`], statements are vetted by
//! [`validator`], and validated statements run through a
//! [`database::StatementExecutor`].

pub mod cli;
pub mod database;
pub mod http_server;
pub mod observability;
pub mod validator;
