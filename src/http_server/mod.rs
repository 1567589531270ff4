//! # HTTP Server Module
//!
//! Axum front end for the patient API.
//!
//! # Endpoints
//!
//! - `/` - Welcome message
//! - `/api/insert-multiple` - Batch patient insert (POST)
//! - `/api/query` - Read (GET) or insert (POST) via raw SQL
//!
//! `OPTIONS` on any path is a CORS preflight and answered with 204.

pub mod config;
pub mod cors;
pub mod errors;
pub mod response;
pub mod routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use response::MessageResponse;
pub use routes::{api_routes, AppState};
pub use server::HttpServer;
