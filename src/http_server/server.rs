//! # HTTP Server
//!
//! Binds the listener and serves the API router.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::observability::{log_event_with_fields, Event};

use super::config::HttpServerConfig;
use super::routes::{api_routes, AppState};

/// HTTP server for the patient API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over already-built collaborators
    pub fn new(config: HttpServerConfig, state: Arc<AppState>) -> Self {
        Self {
            config,
            router: api_routes(state),
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Bind and serve until the process exits
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        log_event_with_fields(Event::ServerStarting, &[("addr", addr.as_str())]);

        let listener = TcpListener::bind(&addr).await?;
        let bound = listener.local_addr()?.to_string();
        log_event_with_fields(Event::Serving, &[("addr", bound.as_str())]);

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
