//! # SQL Statement Validator
//!
//! Decides whether a client-submitted statement may be executed for a given
//! HTTP method. Validation is lexical:
//!
//! 1. Trim and uppercase the statement (comparison only; the original text
//!    is what runs).
//! 2. The statement must start with a permitted kind token.
//! 3. The statement must not contain any of [`DISALLOWED_KEYWORDS`].

mod classifier;
mod kind;
mod result;

pub use classifier::{
    check_statement, is_valid, LexicalClassifier, StatementClassifier, DISALLOWED_KEYWORDS,
};
pub use kind::{AllowedStatementSet, StatementKind};
pub use result::{RejectReason, ValidationResult};
