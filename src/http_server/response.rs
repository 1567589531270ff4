//! # Response Formatting
//!
//! Success bodies and their fixed messages.

use serde::Serialize;

pub const WELCOME: &str = "Welcome to the database API";
pub const PATIENTS_INSERTED: &str = "Patients inserted successfully";
pub const QUERY_EXECUTED: &str = "Query executed successfully";

/// `{"message": "..."}`
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn welcome() -> Self {
        Self::new(WELCOME)
    }

    pub fn patients_inserted() -> Self {
        Self::new(PATIENTS_INSERTED)
    }

    pub fn query_executed() -> Self {
        Self::new(QUERY_EXECUTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization() {
        let json = serde_json::to_value(MessageResponse::patients_inserted()).unwrap();
        assert_eq!(json["message"], "Patients inserted successfully");
        assert_eq!(json.as_object().unwrap().len(), 1);
    }
}
