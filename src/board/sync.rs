//! Remote Sync Adapter: every project mutation goes through here on its way
//! to the project service.
//!
//! The adapter bounds each call with the configured timeout so a hung
//! service shows up as `RemoteUnreachable` like any other outage. It does not
//! decide what happens next; that is the degradation controller's job. The
//! local-synthesis helpers below are what the optimistic policy applies.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use nightwing_common::{ColumnId, Project, ProjectDraft, ProjectId, ProjectPatch};

use super::remote::ProjectRemote;
use crate::errors::{BoardError, BoardResult};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct SyncAdapter {
    remote: Arc<dyn ProjectRemote>,
    timeout: Duration,
}

impl SyncAdapter {
    pub fn new(remote: Arc<dyn ProjectRemote>, timeout: Duration) -> Self {
        Self { remote, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T, F>(&self, op: &'static str, call: F) -> BoardResult<T>
    where
        F: Future<Output = BoardResult<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => {
                if let Err(e) = &result {
                    tracing::debug!(op, error = %e, "Remote call failed");
                }
                result
            }
            Err(_) => {
                tracing::debug!(op, timeout_ms = self.timeout.as_millis() as u64, "Remote call timed out");
                Err(BoardError::RemoteUnreachable(format!(
                    "no response within {}s",
                    self.timeout.as_secs_f32()
                )))
            }
        }
    }

    pub async fn list(&self) -> BoardResult<Vec<Project>> {
        self.bounded("list", self.remote.list()).await
    }

    pub async fn create(&self, draft: &ProjectDraft) -> BoardResult<Project> {
        self.bounded("create", self.remote.create(draft)).await
    }

    pub async fn update(&self, id: &ProjectId, patch: &ProjectPatch) -> BoardResult<Project> {
        self.bounded("update", self.remote.update(id, patch)).await
    }

    pub async fn delete(&self, id: &ProjectId) -> BoardResult<()> {
        self.bounded("delete", self.remote.delete(id)).await
    }
}

/// A project created without the service: clock-based id, local timestamps.
pub fn synthesize_created(
    id: ProjectId,
    draft: &ProjectDraft,
    fallback_status: ColumnId,
    now: DateTime<Utc>,
) -> Project {
    Project::from_draft(id, draft, fallback_status, now)
}

/// A local edit applied without the service, stamped with a fresh `updated_at`.
pub fn synthesize_updated(current: &Project, patch: &ProjectPatch, now: DateTime<Utc>) -> Project {
    current.patched(patch, now)
}

/// The demonstration board shown in offline mode when the initial load fails.
pub fn demo_projects(now: DateTime<Utc>) -> Vec<Project> {
    let first = ProjectDraft::new("Example project")
        .description("This is an example project")
        .responsible("User")
        .status("pending");
    let second = ProjectDraft::new("Project in development")
        .description("A project currently under development")
        .responsible("User")
        .status("in_progress");
    vec![
        Project::from_draft(ProjectId::new("1"), &first, ColumnId::new("pending"), now),
        Project::from_draft(ProjectId::new("2"), &second, ColumnId::new("pending"), now),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// A service that never answers in time.
    struct StalledRemote;

    #[async_trait]
    impl ProjectRemote for StalledRemote {
        async fn list(&self) -> BoardResult<Vec<Project>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::new())
        }
        async fn get(&self, id: &ProjectId) -> BoardResult<Project> {
            Err(BoardError::ProjectNotFound { id: id.to_string() })
        }
        async fn create(&self, _draft: &ProjectDraft) -> BoardResult<Project> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Err(BoardError::RemoteUnreachable("late".into()))
        }
        async fn update(&self, id: &ProjectId, _patch: &ProjectPatch) -> BoardResult<Project> {
            Err(BoardError::ProjectNotFound { id: id.to_string() })
        }
        async fn delete(&self, _id: &ProjectId) -> BoardResult<()> {
            Ok(())
        }
    }

    fn adapter() -> SyncAdapter {
        SyncAdapter::new(Arc::new(StalledRemote), Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_timeout_becomes_unreachable() {
        let err = adapter().list().await.unwrap_err();
        assert!(err.is_unreachable());
        assert!(err.to_string().contains("no response"));
        assert!(adapter().create(&ProjectDraft::new("x")).await.unwrap_err().is_unreachable());
    }

    #[tokio::test]
    async fn test_remote_errors_pass_through() {
        let err = adapter()
            .update(&ProjectId::new("9"), &ProjectPatch::move_to("done"))
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::ProjectNotFound { .. }));
        assert!(adapter().delete(&ProjectId::new("9")).await.is_ok());
    }

    #[test]
    fn test_demo_projects_land_in_default_columns() {
        let projects = demo_projects(Utc::now());
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].status.as_str(), "pending");
        assert_eq!(projects[1].status.as_str(), "in_progress");
    }

    #[test]
    fn test_synthesized_update_refreshes_timestamp_only() {
        let then = Utc::now() - chrono::Duration::hours(1);
        let project = demo_projects(then).remove(0);
        let now = Utc::now();
        let updated = synthesize_updated(&project, &ProjectPatch::move_to("completed"), now);
        assert_eq!(updated.status.as_str(), "completed");
        assert_eq!(updated.created_at, project.created_at);
        assert_eq!(updated.updated_at, now);
        assert_eq!(updated.name, project.name);
    }
}
