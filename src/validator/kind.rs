//! Statement kinds and per-method allow-lists

use std::fmt;

/// Leading command token of a SQL statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// Retrieval (`SELECT ...`)
    Select,
    /// Insertion (`INSERT ...`)
    Insert,
}

impl StatementKind {
    /// Returns the uppercase token this kind is matched against
    pub fn token(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Ordered set of statement kinds permitted for one request type.
///
/// The sets are fixed at compile time; callers pick one per HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedStatementSet {
    kinds: &'static [StatementKind],
}

impl AllowedStatementSet {
    /// Statements accepted on `GET /api/query`
    pub const READ: Self = Self::new(&[StatementKind::Select]);

    /// Statements accepted on `POST /api/query`
    pub const WRITE: Self = Self::new(&[StatementKind::Insert]);

    pub const fn new(kinds: &'static [StatementKind]) -> Self {
        Self { kinds }
    }

    pub fn kinds(&self) -> &'static [StatementKind] {
        self.kinds
    }

    /// True when `normalized` starts with the token of any permitted kind.
    ///
    /// `normalized` must already be trimmed and uppercased.
    pub fn permits_prefix(&self, normalized: &str) -> bool {
        self.kinds
            .iter()
            .any(|kind| normalized.starts_with(kind.token()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert_eq!(StatementKind::Select.token(), "SELECT");
        assert_eq!(StatementKind::Insert.to_string(), "INSERT");
    }

    #[test]
    fn test_read_set_only_permits_select() {
        assert!(AllowedStatementSet::READ.permits_prefix("SELECT * FROM PATIENT"));
        assert!(!AllowedStatementSet::READ.permits_prefix("INSERT INTO PATIENT"));
    }

    #[test]
    fn test_prefix_is_not_word_bounded() {
        // Matching is lexical, so SELECTED still starts with SELECT.
        assert!(AllowedStatementSet::READ.permits_prefix("SELECTED"));
    }

    #[test]
    fn test_combined_set() {
        let set = AllowedStatementSet::new(&[StatementKind::Select, StatementKind::Insert]);
        assert!(set.permits_prefix("INSERT INTO PATIENT VALUES (1)"));
        assert!(set.permits_prefix("SELECT 1"));
        assert_eq!(set.kinds().len(), 2);
    }
}
