//! Typed error hierarchy for the Nightwing board.
//!
//! `BoardError` covers everything a board action can surface to the user.
//! Only `RemoteUnreachable` is subject to the fallback policy; the others are
//! always shown and never absorbed.

use nightwing_common::ValidationError;
use thiserror::Error;

/// Errors surfaced by board actions.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Project {id} not found")]
    ProjectNotFound { id: String },

    #[error("Column {id} not found")]
    ColumnNotFound { id: String },

    #[error("Project service unreachable: {0}")]
    RemoteUnreachable(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Project {id} already has a change in flight")]
    Busy { id: String },

    #[error("Local storage error: {0}")]
    Storage(#[source] anyhow::Error),
}

impl BoardError {
    /// Whether this failure means the remote store could not be reached,
    /// i.e. whether a fallback policy may substitute local state.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, BoardError::RemoteUnreachable(_))
    }
}

impl From<ValidationError> for BoardError {
    fn from(err: ValidationError) -> Self {
        BoardError::Validation(err.to_string())
    }
}

pub type BoardResult<T> = Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_error_project_not_found_carries_id() {
        let err = BoardError::ProjectNotFound { id: "42".into() };
        match &err {
            BoardError::ProjectNotFound { id } => assert_eq!(id, "42"),
            _ => panic!("Expected ProjectNotFound"),
        }
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn only_unreachable_is_fallback_eligible() {
        assert!(BoardError::RemoteUnreachable("timeout".into()).is_unreachable());
        assert!(!BoardError::ProjectNotFound { id: "1".into() }.is_unreachable());
        assert!(!BoardError::ColumnNotFound { id: "x".into() }.is_unreachable());
        assert!(!BoardError::Validation("name".into()).is_unreachable());
        assert!(!BoardError::Busy { id: "1".into() }.is_unreachable());
    }

    #[test]
    fn validation_error_converts() {
        let err: BoardError = ValidationError { field: "column name" }.into();
        match &err {
            BoardError::Validation(msg) => assert!(msg.contains("column name")),
            _ => panic!("Expected Validation"),
        }
    }

    #[test]
    fn storage_error_keeps_source() {
        let err = BoardError::Storage(anyhow::anyhow!("disk full"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&BoardError::Busy { id: "x".into() });
    }
}
