use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ColumnId, ProjectId};
use crate::{ValidationError, require};

/// A unit of tracked work shown as a card on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub responsible: String,
    pub status: ColumnId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Materialize a draft. `fallback_status` is used when the draft names no
    /// status or a blank one.
    pub fn from_draft(
        id: ProjectId,
        draft: &ProjectDraft,
        fallback_status: ColumnId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            responsible: draft.responsible.clone(),
            status: draft
                .status
                .clone()
                .filter(|status| !status.as_str().trim().is_empty())
                .unwrap_or(fallback_status),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the fields present in `patch` and stamp `updated_at`.
    pub fn apply(&mut self, patch: &ProjectPatch, now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(responsible) = &patch.responsible {
            self.responsible = responsible.clone();
        }
        if let Some(status) = &patch.status {
            self.status = status.clone();
        }
        self.updated_at = now;
    }

    /// Copy of this project with `patch` applied.
    pub fn patched(&self, patch: &ProjectPatch, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.apply(patch, now);
        next
    }
}

/// Fields a user submits to create a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub responsible: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ColumnId>,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn responsible(mut self, responsible: impl Into<String>) -> Self {
        self.responsible = responsible.into();
        self
    }

    pub fn status(mut self, status: impl Into<ColumnId>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)
    }
}

/// A partial update: every present field overwrites, absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ColumnId>,
}

impl ProjectPatch {
    /// The patch a drag-and-drop reassignment produces.
    pub fn move_to(status: impl Into<ColumnId>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.responsible.is_none()
            && self.status.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(status) = &self.status {
            require("status", status.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn sample() -> Project {
        let draft = ProjectDraft::new("Patrol")
            .description("Night shift")
            .responsible("Dick");
        Project::from_draft(ProjectId::new("1"), &draft, ColumnId::new("pending"), at(100))
    }

    #[test]
    fn test_from_draft_uses_fallback_status() {
        let project = sample();
        assert_eq!(project.status.as_str(), "pending");
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn test_from_draft_treats_blank_status_as_missing() {
        let draft = ProjectDraft::new("x").status("  ");
        let project = Project::from_draft(ProjectId::new("3"), &draft, "pending".into(), at(1));
        assert_eq!(project.status.as_str(), "pending");
    }

    #[test]
    fn test_from_draft_keeps_explicit_status() {
        let draft = ProjectDraft::new("x").status("completed");
        let project = Project::from_draft(ProjectId::new("2"), &draft, "pending".into(), at(1));
        assert_eq!(project.status.as_str(), "completed");
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut project = sample();
        project.apply(&ProjectPatch::move_to("done"), at(200));
        assert_eq!(project.status.as_str(), "done");
        assert_eq!(project.name, "Patrol");
        assert_eq!(project.description, "Night shift");
        assert_eq!(project.created_at, at(100));
        assert_eq!(project.updated_at, at(200));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_draft_without_status_omits_field() {
        let value = serde_json::to_value(ProjectDraft::new("a")).unwrap();
        assert!(value.get("status").is_none());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let err = ProjectDraft::new("   ").validate().unwrap_err();
        assert_eq!(err.field, "name");

        let patch = ProjectPatch {
            name: Some(String::new()),
            ..ProjectPatch::default()
        };
        assert!(patch.validate().is_err());
        assert!(ProjectPatch::move_to("x").validate().is_ok());
    }

    #[test]
    fn test_patch_deserializes_any_subset() {
        let patch: ProjectPatch = serde_json::from_str(r#"{"status":"in_progress"}"#).unwrap();
        assert_eq!(patch, ProjectPatch::move_to("in_progress"));
        assert!(!patch.is_empty());
        let empty: ProjectPatch = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
