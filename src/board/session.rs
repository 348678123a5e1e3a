//! `BoardSession`: the one place board state changes.
//!
//! A session owns the Column Store and the Project Store, routes project
//! mutations through the sync adapter, and lets the degradation controller
//! settle every remote failure. Callers only ever see consistent state: the
//! internal lock is held for bookkeeping and never across a remote call.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use nightwing_common::{
    Column, ColumnColor, ColumnId, ColumnPatch, Project, ProjectDraft, ProjectId, ProjectPatch,
};

use super::columns::ColumnStore;
use super::degrade::{
    DegradationController, Fallback, FallbackPolicy, Notice, OpKind, OpState, Ticket,
};
use super::projects::ProjectStore;
use super::reconcile::{self, BoardView, DragState};
use super::remote::ProjectRemote;
use super::storage::KeyValueStore;
use super::sync::{self, SyncAdapter};
use crate::errors::{BoardError, BoardResult};

/// Status the project service assigns when a draft names none.
const SERVICE_DEFAULT_STATUS: &str = "pending";

struct BoardState {
    columns: ColumnStore,
    projects: ProjectStore,
    controller: DegradationController,
    drag: DragState,
}

pub struct BoardSession {
    sync: SyncAdapter,
    state: Mutex<BoardState>,
}

/// An operation waiting on the service. If the future driving it is dropped
/// before it resolves, the ticket is abandoned so the project is not left
/// marked as busy.
struct InFlight<'a> {
    session: &'a BoardSession,
    ticket: Option<Ticket>,
}

impl InFlight<'_> {
    fn succeed(mut self, controller: &mut DegradationController) {
        if let Some(ticket) = self.ticket.take() {
            controller.succeed(ticket);
        }
    }

    fn fail(mut self, controller: &mut DegradationController, err: &BoardError) -> Fallback {
        match self.ticket.take() {
            Some(ticket) => controller.fail(ticket, err),
            None => Fallback::Reject,
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        // Only reached with a ticket when the owning future was cancelled at
        // an await point, where the state lock is never held.
        if let Some(ticket) = self.ticket.take() {
            self.session.lock().controller.abandon(ticket);
        }
    }
}

impl BoardSession {
    pub fn new(columns: ColumnStore, sync: SyncAdapter, policy: FallbackPolicy) -> Self {
        Self {
            sync,
            state: Mutex::new(BoardState {
                columns,
                projects: ProjectStore::new(),
                controller: DegradationController::new(policy),
                drag: DragState::default(),
            }),
        }
    }

    /// Load columns from `store` and wire up `remote` with a bounded timeout.
    /// Projects are not fetched until [`load`](Self::load).
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        remote: Arc<dyn ProjectRemote>,
        policy: FallbackPolicy,
        timeout: Duration,
    ) -> BoardResult<Self> {
        let columns = ColumnStore::load(store)?;
        Ok(Self::new(columns, SyncAdapter::new(remote, timeout), policy))
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        // State is only mutated in short, panic-free sections.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn track(&self, ticket: Ticket) -> InFlight<'_> {
        InFlight {
            session: self,
            ticket: Some(ticket),
        }
    }

    /// Record `err` as the current notice and hand it back.
    fn surface<T>(&self, err: BoardError) -> BoardResult<T> {
        self.lock().controller.report(&err);
        Err(err)
    }

    // ── Policy and notices ─────────────────────────────────────────────

    pub fn policy(&self) -> FallbackPolicy {
        self.lock().controller.policy()
    }

    pub fn set_policy(&self, policy: FallbackPolicy) {
        self.lock().controller.set_policy(policy);
    }

    /// The user-visible offline toggle.
    pub fn set_offline(&self, offline: bool) {
        let policy = if offline {
            FallbackPolicy::Optimistic
        } else {
            FallbackPolicy::Strict
        };
        self.set_policy(policy);
    }

    pub fn notice(&self) -> Option<Notice> {
        self.lock().controller.notice().cloned()
    }

    pub fn dismiss_notice(&self) {
        self.lock().controller.dismiss();
    }

    pub fn op_state(&self, kind: OpKind) -> OpState {
        self.lock().controller.state(kind)
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub fn columns(&self) -> Vec<Column> {
        self.lock().columns.list()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.lock().projects.all().to_vec()
    }

    pub fn project(&self, id: &ProjectId) -> Option<Project> {
        self.lock().projects.get(id).cloned()
    }

    /// Fresh projection of the current columns and projects.
    pub fn board(&self) -> BoardView {
        let state = self.lock();
        reconcile::group_by_column(&state.columns.list(), state.projects.all())
    }

    // ── Project actions ────────────────────────────────────────────────

    /// Replace the project collection with the service's. Returns how many
    /// projects the board now holds.
    pub async fn load(&self) -> BoardResult<usize> {
        let ticket = self.lock().controller.begin(OpKind::Load, None)?;
        let ticket = self.track(ticket);

        match self.sync.list().await {
            Ok(projects) => {
                let mut state = self.lock();
                let count = projects.len();
                state.projects.replace_all(projects);
                ticket.succeed(&mut state.controller);
                tracing::info!(count, "Loaded projects");
                Ok(count)
            }
            Err(err) => {
                let mut state = self.lock();
                match ticket.fail(&mut state.controller, &err) {
                    Fallback::ApplyLocal => {
                        let demo = sync::demo_projects(Utc::now());
                        let count = demo.len();
                        state.projects.replace_all(demo);
                        Ok(count)
                    }
                    Fallback::Reject => {
                        state.projects.replace_all(Vec::new());
                        Err(err)
                    }
                }
            }
        }
    }

    pub async fn create_project(&self, draft: ProjectDraft) -> BoardResult<Project> {
        if let Err(e) = draft.validate() {
            return self.surface(e.into());
        }

        let (draft, ticket) = {
            let mut state = self.lock();
            let mut draft = draft;
            let unknown = draft
                .status
                .as_ref()
                .filter(|status| !state.columns.contains(status))
                .map(|status| status.to_string());
            if let Some(id) = unknown {
                let err = BoardError::ColumnNotFound { id };
                state.controller.report(&err);
                return Err(err);
            }
            if draft.status.is_none() {
                draft.status = state.columns.first().map(|c| c.id);
            }
            let ticket = state.controller.begin(OpKind::Create, None)?;
            (draft, ticket)
        };
        let ticket = self.track(ticket);

        match self.sync.create(&draft).await {
            Ok(project) => {
                let mut state = self.lock();
                state.projects.insert(project.clone());
                ticket.succeed(&mut state.controller);
                tracing::info!(project_id = %project.id, "Created project");
                Ok(project)
            }
            Err(err) => {
                let mut state = self.lock();
                match ticket.fail(&mut state.controller, &err) {
                    Fallback::ApplyLocal => {
                        let now = Utc::now();
                        let id = state.projects.next_local_id(now);
                        let project = sync::synthesize_created(
                            id,
                            &draft,
                            ColumnId::new(SERVICE_DEFAULT_STATUS),
                            now,
                        );
                        state.projects.insert(project.clone());
                        tracing::info!(project_id = %project.id, "Created project locally");
                        Ok(project)
                    }
                    Fallback::Reject => Err(err),
                }
            }
        }
    }

    pub async fn update_project(&self, id: &ProjectId, patch: ProjectPatch) -> BoardResult<Project> {
        if let Err(e) = patch.validate() {
            return self.surface(e.into());
        }

        let (current, ticket) = {
            let mut state = self.lock();
            let current = match state.projects.get(id) {
                Some(p) => p.clone(),
                None => {
                    let err = BoardError::ProjectNotFound { id: id.to_string() };
                    state.controller.report(&err);
                    return Err(err);
                }
            };
            if let Some(status) = &patch.status {
                if !state.columns.contains(status) {
                    let err = BoardError::ColumnNotFound { id: status.to_string() };
                    state.controller.report(&err);
                    return Err(err);
                }
            }
            if patch.is_empty() {
                return Ok(current);
            }
            match state.controller.begin(OpKind::Update, Some(id)) {
                Ok(ticket) => (current, ticket),
                Err(err) => {
                    state.controller.report(&err);
                    return Err(err);
                }
            }
        };
        let ticket = self.track(ticket);

        match self.sync.update(id, &patch).await {
            Ok(project) => {
                let mut state = self.lock();
                state.projects.replace(project.clone());
                ticket.succeed(&mut state.controller);
                tracing::info!(project_id = %id, "Updated project");
                Ok(project)
            }
            Err(err) => {
                let mut state = self.lock();
                match ticket.fail(&mut state.controller, &err) {
                    Fallback::ApplyLocal => {
                        let project = sync::synthesize_updated(&current, &patch, Utc::now());
                        state.projects.replace(project.clone());
                        tracing::info!(project_id = %id, "Updated project locally");
                        Ok(project)
                    }
                    Fallback::Reject => Err(err),
                }
            }
        }
    }

    pub async fn delete_project(&self, id: &ProjectId) -> BoardResult<()> {
        let ticket = {
            let mut state = self.lock();
            let attempt = if state.projects.get(id).is_none() {
                Err(BoardError::ProjectNotFound { id: id.to_string() })
            } else {
                state.controller.begin(OpKind::Delete, Some(id))
            };
            match attempt {
                Ok(ticket) => ticket,
                Err(err) => {
                    state.controller.report(&err);
                    return Err(err);
                }
            }
        };
        let ticket = self.track(ticket);

        let result = self.sync.delete(id).await;
        let mut state = self.lock();
        match result {
            Ok(()) => {
                state.projects.remove(id);
                ticket.succeed(&mut state.controller);
                tracing::info!(project_id = %id, "Deleted project");
                Ok(())
            }
            Err(err) => match ticket.fail(&mut state.controller, &err) {
                Fallback::ApplyLocal => {
                    state.projects.remove(id);
                    tracing::info!(project_id = %id, "Deleted project locally");
                    Ok(())
                }
                Fallback::Reject => Err(err),
            },
        }
    }

    /// Move a project to `target`. Dropping onto its own column changes
    /// nothing and makes no remote call.
    pub async fn handle_drop(&self, id: &ProjectId, target: &ColumnId) -> BoardResult<Project> {
        let patch = {
            let mut state = self.lock();
            let lookup = match state.projects.get(id) {
                None => Err(BoardError::ProjectNotFound { id: id.to_string() }),
                Some(_) if !state.columns.contains(target) => {
                    Err(BoardError::ColumnNotFound { id: target.to_string() })
                }
                Some(project) => Ok((project.clone(), reconcile::plan_drop(project, target))),
            };
            match lookup {
                Ok((project, None)) => return Ok(project),
                Ok((_, Some(patch))) => patch,
                Err(err) => {
                    state.controller.report(&err);
                    return Err(err);
                }
            }
        };

        tracing::debug!(project_id = %id, column_id = %target, "Dropping project");
        self.update_project(id, patch).await
    }

    // ── Drag interaction ───────────────────────────────────────────────

    pub fn drag_start(&self, id: &ProjectId) -> BoardResult<()> {
        let mut state = self.lock();
        if state.projects.get(id).is_none() {
            return Err(BoardError::ProjectNotFound { id: id.to_string() });
        }
        state.drag.start(id.clone());
        Ok(())
    }

    pub fn drag_over(&self, column: &ColumnId) {
        self.lock().drag.hover(column.clone());
    }

    pub fn drag_leave(&self) {
        self.lock().drag.leave();
    }

    pub fn drag_cancel(&self) {
        self.lock().drag.cancel();
    }

    pub fn drag_state(&self) -> DragState {
        self.lock().drag.clone()
    }

    /// Finish the current drag on `target`. The drag state is back to idle
    /// before the move is dispatched, whatever its outcome.
    pub async fn drop_on(&self, target: &ColumnId) -> BoardResult<Option<Project>> {
        let intent = self.lock().drag.drop_on(target.clone());
        match intent {
            Some(intent) => self.handle_drop(&intent.project, &intent.target).await.map(Some),
            None => Ok(None),
        }
    }

    // ── Column actions (local, synchronous) ────────────────────────────

    pub fn create_column(&self, name: &str, color: ColumnColor) -> BoardResult<Column> {
        let mut state = self.lock();
        let result = state.columns.create(name, color);
        Self::note_column_error(&mut state, result)
    }

    pub fn update_column(&self, id: &ColumnId, patch: &ColumnPatch) -> BoardResult<Column> {
        let mut state = self.lock();
        let result = state.columns.update(id, patch);
        Self::note_column_error(&mut state, result)
    }

    /// Remove a column. Projects that pointed at it stay in the store and
    /// reappear if a column with the same id comes back.
    pub fn delete_column(&self, id: &ColumnId) -> BoardResult<bool> {
        let mut state = self.lock();
        let result = state.columns.delete(id);
        Self::note_column_error(&mut state, result)
    }

    pub fn reorder_column(&self, id: &ColumnId, position: usize) -> BoardResult<Vec<Column>> {
        let mut state = self.lock();
        let result = state.columns.reorder(id, position);
        Self::note_column_error(&mut state, result)
    }

    fn note_column_error<T>(state: &mut BoardState, result: BoardResult<T>) -> BoardResult<T> {
        if let Err(err) = &result {
            state.controller.report(err);
        }
        result
    }
}
