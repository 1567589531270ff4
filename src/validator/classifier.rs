//! Lexical statement classifier
//!
//! The default classifier is a coarse filter, not a parser. It cannot tell a
//! blocked keyword used as a command from one inside a string literal or an
//! identifier, so `SELECT * FROM patient WHERE name = 'Dropbox'` is refused.
//! That false positive is accepted behavior. A grammar-aware classifier can
//! replace it through [`StatementClassifier`] without touching the routes.

use super::kind::AllowedStatementSet;
use super::result::{RejectReason, ValidationResult};

/// Keywords refused anywhere in a statement, regardless of method
pub const DISALLOWED_KEYWORDS: [&str; 6] =
    ["UPDATE", "DELETE", "DROP", "ALTER", "TRUNCATE", "CREATE"];

/// Decides whether a statement may run under a given allow-list
pub trait StatementClassifier: Send + Sync {
    /// Classify a non-empty statement.
    ///
    /// Must be pure: the same inputs always give the same result.
    fn classify(&self, statement: &str, allowed: &AllowedStatementSet) -> ValidationResult;
}

/// Prefix + substring classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalClassifier;

impl LexicalClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Uppercased, trimmed form used only for comparison
    fn normalize(statement: &str) -> String {
        statement.trim().to_uppercase()
    }
}

impl StatementClassifier for LexicalClassifier {
    fn classify(&self, statement: &str, allowed: &AllowedStatementSet) -> ValidationResult {
        let normalized = Self::normalize(statement);

        if !allowed.permits_prefix(&normalized) {
            return ValidationResult::Rejected(RejectReason::KindNotAllowed);
        }

        match DISALLOWED_KEYWORDS
            .iter()
            .copied()
            .find(|keyword| normalized.contains(keyword))
        {
            Some(keyword) => ValidationResult::Rejected(RejectReason::DisallowedKeyword(keyword)),
            None => ValidationResult::Accepted,
        }
    }
}

/// Validate `statement` with the lexical classifier.
///
/// Assumes a non-empty statement; use [`check_statement`] when the payload
/// may be absent.
pub fn is_valid(statement: &str, allowed: &AllowedStatementSet) -> ValidationResult {
    LexicalClassifier.classify(statement, allowed)
}

/// Full gate used by the request handlers: an absent or blank statement is
/// `QueryMissing`, everything else goes through `classifier`.
pub fn check_statement(
    statement: Option<&str>,
    allowed: &AllowedStatementSet,
    classifier: &dyn StatementClassifier,
) -> ValidationResult {
    match statement {
        Some(sql) if !sql.trim().is_empty() => classifier.classify(sql, allowed),
        _ => ValidationResult::Rejected(RejectReason::QueryMissing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read() -> AllowedStatementSet {
        AllowedStatementSet::READ
    }

    fn write() -> AllowedStatementSet {
        AllowedStatementSet::WRITE
    }

    #[test]
    fn test_select_accepted_for_read() {
        assert_eq!(is_valid("SELECT * FROM patient", &read()), ValidationResult::Accepted);
    }

    #[test]
    fn test_case_and_whitespace_are_ignored() {
        assert!(is_valid("   select name from patient\n", &read()).is_accepted());
        assert!(is_valid("\tInSeRt INTO patient (name) VALUES ('a')", &write()).is_accepted());
    }

    #[test]
    fn test_wrong_kind_rejected() {
        assert_eq!(
            is_valid("INSERT INTO patient (name) VALUES ('a')", &read()),
            ValidationResult::Rejected(RejectReason::KindNotAllowed)
        );
        assert_eq!(
            is_valid("UPDATE patient SET name='x'", &write()),
            ValidationResult::Rejected(RejectReason::KindNotAllowed)
        );
    }

    #[test]
    fn test_prefix_checked_before_keywords() {
        // Both checks fail; the kind check wins.
        assert_eq!(
            is_valid("DROP TABLE patient", &read()),
            ValidationResult::Rejected(RejectReason::KindNotAllowed)
        );
    }

    #[test]
    fn test_blocked_keyword_anywhere() {
        assert_eq!(
            is_valid("SELECT 1; DROP TABLE patient", &read()),
            ValidationResult::Rejected(RejectReason::DisallowedKeyword("DROP"))
        );
        assert_eq!(
            is_valid("INSERT INTO patient SELECT * FROM x; delete from patient", &write()),
            ValidationResult::Rejected(RejectReason::DisallowedKeyword("DELETE"))
        );
    }

    #[test]
    fn test_keyword_inside_literal_is_false_positive() {
        assert_eq!(
            is_valid("SELECT * FROM patient WHERE name = 'Createson'", &read()),
            ValidationResult::Rejected(RejectReason::DisallowedKeyword("CREATE"))
        );
        // Column names count too.
        assert!(!is_valid("SELECT updated_at FROM patient", &read()).is_accepted());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let statements = [
            "SELECT * FROM patient",
            "SELECT 1; TRUNCATE patient",
            "insert into patient (name) values ('b')",
            "ALTER TABLE patient ADD x INT",
        ];
        for sql in statements {
            for allowed in [read(), write()] {
                assert_eq!(is_valid(sql, &allowed), is_valid(sql, &allowed));
            }
        }
    }

    #[test]
    fn test_check_statement_missing() {
        let classifier = LexicalClassifier::new();
        assert_eq!(
            check_statement(None, &read(), &classifier),
            ValidationResult::Rejected(RejectReason::QueryMissing)
        );
        assert_eq!(
            check_statement(Some("   "), &read(), &classifier),
            ValidationResult::Rejected(RejectReason::QueryMissing)
        );
        assert!(check_statement(Some("SELECT 1"), &read(), &classifier).is_accepted());
    }

    #[test]
    fn test_custom_classifier_is_used() {
        struct RejectAll;

        impl StatementClassifier for RejectAll {
            fn classify(&self, _: &str, _: &AllowedStatementSet) -> ValidationResult {
                ValidationResult::Rejected(RejectReason::KindNotAllowed)
            }
        }

        assert!(!check_statement(Some("SELECT 1"), &read(), &RejectAll).is_accepted());
    }
}
