//! Project Store: the client's working copy of the project collection.
//!
//! Order is whatever the project service returned, followed by creations in
//! the order they happened. Nothing here talks to the network; the session
//! decides what gets written.

use chrono::{DateTime, Utc};
use nightwing_common::{Project, ProjectId};

#[derive(Debug, Default, Clone)]
pub struct ProjectStore {
    projects: Vec<Project>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, projects: Vec<Project>) {
        self.projects = projects;
    }

    pub fn all(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn insert(&mut self, project: Project) {
        self.projects.push(project);
    }

    /// Replace the entry with the same id. Returns false if none existed.
    pub fn replace(&mut self, project: Project) -> bool {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(slot) => {
                *slot = project;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &ProjectId) -> Option<Project> {
        let index = self.projects.iter().position(|p| &p.id == id)?;
        Some(self.projects.remove(index))
    }

    /// A millisecond-timestamp identifier for a project created without the
    /// project service, bumped until it collides with nothing in the store.
    pub fn next_local_id(&self, now: DateTime<Utc>) -> ProjectId {
        let mut candidate = now.timestamp_millis();
        loop {
            let id = ProjectId::new(candidate.to_string());
            if self.get(&id).is_none() {
                return id;
            }
            candidate += 1;
        }
    }
}
