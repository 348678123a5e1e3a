use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use nightwing_common::{ColumnId, Project, ProjectDraft, ProjectId, ProjectPatch, ValidationError};
use thiserror::Error;
use uuid::Uuid;

/// Status given to projects created without one.
pub const DEFAULT_STATUS: &str = "pending";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Project {0} not found")]
    NotFound(ProjectId),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Repository lock poisoned")]
    Poisoned,
}

/// In-memory project collection behind the service. Owned by the server's
/// `AppState`; every request goes through the same instance.
pub struct ProjectRepository {
    projects: Mutex<Vec<Project>>,
}

impl ProjectRepository {
    /// A repository holding the three sample projects.
    pub fn seeded() -> Self {
        Self::with_projects(sample_projects(Utc::now()))
    }

    pub fn empty() -> Self {
        Self::with_projects(Vec::new())
    }

    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            projects: Mutex::new(projects),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Project>>, RepositoryError> {
        self.projects.lock().map_err(|_| RepositoryError::Poisoned)
    }

    pub fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        Ok(self.lock()?.clone())
    }

    pub fn get(&self, id: &ProjectId) -> Result<Project, RepositoryError> {
        self.lock()?
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    pub fn create(&self, draft: &ProjectDraft) -> Result<Project, RepositoryError> {
        draft.validate()?;
        let id = ProjectId::new(Uuid::new_v4().to_string());
        let project = Project::from_draft(id, draft, ColumnId::new(DEFAULT_STATUS), Utc::now());
        self.lock()?.push(project.clone());
        Ok(project)
    }

    /// Merge the fields present in `patch` and refresh `updated_at`.
    pub fn update(&self, id: &ProjectId, patch: &ProjectPatch) -> Result<Project, RepositoryError> {
        patch.validate()?;
        let mut projects = self.lock()?;
        let project = projects
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        project.apply(patch, Utc::now());
        Ok(project.clone())
    }

    pub fn delete(&self, id: &ProjectId) -> Result<(), RepositoryError> {
        let mut projects = self.lock()?;
        let before = projects.len();
        projects.retain(|p| &p.id != id);
        if projects.len() == before {
            return Err(RepositoryError::NotFound(id.clone()));
        }
        Ok(())
    }
}

fn sample_projects(now: DateTime<Utc>) -> Vec<Project> {
    let samples = [
        (
            "1",
            "Gotham Protection",
            "Patrol the streets of Gotham City at night",
            "Dick Grayson",
            "in_progress",
        ),
        (
            "2",
            "Titans Training",
            "Coordinate the Teen Titans training sessions",
            "Nightwing",
            "pending",
        ),
        (
            "3",
            "Organized Crime Investigation",
            "Investigate links between the crime families of Blüdhaven",
            "Dick Grayson",
            "completed",
        ),
    ];

    samples
        .into_iter()
        .map(|(id, name, description, responsible, status)| {
            let draft = ProjectDraft::new(name)
                .description(description)
                .responsible(responsible)
                .status(status);
            Project::from_draft(ProjectId::new(id), &draft, ColumnId::new(DEFAULT_STATUS), now)
        })
        .collect()
}
