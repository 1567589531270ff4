//! Observability for patientdb
//!
//! Structured JSON logging with typed lifecycle and request events.
//!
//! ```ignore
//! use patientdb::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::Serving, &[("addr", "0.0.0.0:4000")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

/// Log a request-level failure to stderr
pub fn log_failure(event: Event, fields: &[(&str, &str)]) {
    Logger::error(event.as_str(), fields);
}
