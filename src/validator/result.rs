//! Validation outcome types

use std::fmt;

/// Why a statement was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No statement, or only whitespace
    QueryMissing,
    /// Statement does not start with a permitted kind
    KindNotAllowed,
    /// Statement contains a blocked keyword somewhere in its text
    DisallowedKeyword(&'static str),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::QueryMissing => write!(f, "query missing"),
            RejectReason::KindNotAllowed => write!(f, "statement kind not allowed"),
            RejectReason::DisallowedKeyword(keyword) => {
                write!(f, "disallowed keyword present: {}", keyword)
            }
        }
    }
}

/// Outcome of validating one statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Accepted,
    Rejected(RejectReason),
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted)
    }

    /// Returns the rejection reason, if any
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            ValidationResult::Accepted => None,
            ValidationResult::Rejected(reason) => Some(*reason),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationResult::Accepted => write!(f, "accepted"),
            ValidationResult::Rejected(reason) => write!(f, "rejected: {}", reason),
        }
    }
}
