use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a project. Assigned by the remote store, or synthesized from
/// the clock when a project is created while the remote store is unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of a board column.
///
/// A project's `status` is a `ColumnId`, but nothing guarantees the column
/// still exists: legacy data and column deletion both leave dangling
/// references. Resolve against the live column set at read time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ColumnId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_bare_strings() {
        let id = ProjectId::new("42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
        let col: ColumnId = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(col.as_str(), "in_progress");
    }

    #[test]
    fn test_column_id_accepts_any_legacy_string() {
        let col: ColumnId = serde_json::from_str("\"Some Old Column Name\"").unwrap();
        assert_eq!(col.to_string(), "Some Old Column Name");
    }
}
