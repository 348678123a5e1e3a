//! Shared domain types for the Nightwing kanban board.
//!
//! Both the board client (`nightwing::board`) and the project CRUD service
//! (`nightwing::server`) speak in these types. The wire format is camelCase
//! JSON, matching what browser clients of the service already send.

pub mod column;
pub mod ids;
pub mod project;

pub use column::{Column, ColumnColor, ColumnPatch};
pub use ids::{ColumnId, ProjectId};
pub use project::{Project, ProjectDraft, ProjectPatch};

use thiserror::Error;

/// A required field was missing or blank. Raised before any store is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} must not be empty")]
pub struct ValidationError {
    pub field: &'static str,
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError { field })
    } else {
        Ok(())
    }
}
