//! Board Reconciler: turns the column set and the project collection into
//! lanes, and turns drops into project patches.
//!
//! The projection is a pure function of its inputs and is recomputed every
//! time it is asked for. Projects whose status names no live column are kept
//! aside in `unmatched` rather than dropped or guessed into a lane.

use std::collections::HashMap;

use nightwing_common::{Column, ColumnId, Project, ProjectId, ProjectPatch};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lane {
    pub column: Column,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub lanes: Vec<Lane>,
    pub unmatched: Vec<Project>,
}

impl BoardView {
    /// Projects shown in some lane.
    pub fn placed(&self) -> usize {
        self.lanes.iter().map(|l| l.projects.len()).sum()
    }

    pub fn total(&self) -> usize {
        self.placed() + self.unmatched.len()
    }

    pub fn lane(&self, id: &ColumnId) -> Option<&Lane> {
        self.lanes.iter().find(|l| &l.column.id == id)
    }
}

/// Bucket projects under their columns. Columns come out sorted by `order`
/// (stable); within a lane projects keep their store order.
pub fn group_by_column(columns: &[Column], projects: &[Project]) -> BoardView {
    let mut sorted = columns.to_vec();
    sorted.sort_by_key(|c| c.order);

    let mut by_status: HashMap<&ColumnId, Vec<Project>> = HashMap::new();
    for project in projects {
        by_status.entry(&project.status).or_default().push(project.clone());
    }

    let mut lanes = Vec::with_capacity(sorted.len());
    for column in sorted {
        let projects = by_status.remove(&column.id).unwrap_or_default();
        lanes.push(Lane { column, projects });
    }

    // Whatever is left has a status matching no column. Walk the input again
    // so the remainder keeps store order.
    let unmatched = projects
        .iter()
        .filter(|p| by_status.contains_key(&p.status))
        .cloned()
        .collect();

    BoardView { lanes, unmatched }
}

/// The update a drop onto `target` calls for, or `None` when the project is
/// already there.
pub fn plan_drop(project: &Project, target: &ColumnId) -> Option<ProjectPatch> {
    if &project.status == target {
        None
    } else {
        Some(ProjectPatch::move_to(target.clone()))
    }
}

/// A completed drag: move `project` to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIntent {
    pub project: ProjectId,
    pub target: ColumnId,
}

/// Ephemeral drag-and-drop interaction, independent of the input device.
///
/// `Idle → Dragging → (drop) → Idle`; a drop yields a [`DropIntent`] and the
/// state resets no matter what happens to the intent afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        project: ProjectId,
        over: Option<ColumnId>,
    },
}

impl DragState {
    pub fn start(&mut self, project: ProjectId) {
        *self = DragState::Dragging { project, over: None };
    }

    pub fn hover(&mut self, column: ColumnId) {
        if let DragState::Dragging { over, .. } = self {
            *over = Some(column);
        }
    }

    pub fn leave(&mut self) {
        if let DragState::Dragging { over, .. } = self {
            *over = None;
        }
    }

    pub fn cancel(&mut self) {
        *self = DragState::Idle;
    }

    pub fn drop_on(&mut self, target: ColumnId) -> Option<DropIntent> {
        match std::mem::take(self) {
            DragState::Dragging { project, .. } => Some(DropIntent { project, target }),
            DragState::Idle => None,
        }
    }

    pub fn dragged(&self) -> Option<&ProjectId> {
        match self {
            DragState::Dragging { project, .. } => Some(project),
            DragState::Idle => None,
        }
    }

    pub fn hovered(&self) -> Option<&ColumnId> {
        match self {
            DragState::Dragging { over, .. } => over.as_ref(),
            DragState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nightwing_common::{ColumnColor, ProjectDraft};
    use std::collections::HashSet;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("done", "Done", ColumnColor::Green, 3),
            Column::new("todo", "To Do", ColumnColor::Gray, 1),
            Column::new("doing", "Doing", ColumnColor::Blue, 2),
        ]
    }

    fn project(id: &str, status: &str) -> Project {
        Project::from_draft(
            ProjectId::new(id),
            &ProjectDraft::new(format!("p{}", id)).status(status),
            "todo".into(),
            Utc::now(),
        )
    }

    #[test]
    fn test_lanes_follow_column_order() {
        let view = group_by_column(&columns(), &[]);
        let ids: Vec<_> = view.lanes.iter().map(|l| l.column.id.as_str()).collect();
        assert_eq!(ids, vec!["todo", "doing", "done"]);
        assert_eq!(view.total(), 0);
    }

    #[test]
    fn test_partition_accounts_for_every_project_once() {
        let projects = vec![
            project("1", "todo"),
            project("2", "done"),
            project("3", "ghost"),
            project("4", "todo"),
            project("5", "doing"),
            project("6", "archived"),
        ];
        let view = group_by_column(&columns(), &projects);

        let mut seen = HashSet::new();
        for lane in &view.lanes {
            for p in &lane.projects {
                assert_eq!(p.status, lane.column.id);
                assert!(seen.insert(p.id.clone()), "duplicate {}", p.id);
            }
        }
        for p in &view.unmatched {
            assert!(seen.insert(p.id.clone()), "duplicate {}", p.id);
        }
        assert_eq!(seen.len(), projects.len());
        assert_eq!(view.total(), projects.len());
    }

    #[test]
    fn test_lane_keeps_store_order() {
        let projects = vec![project("b", "todo"), project("a", "todo")];
        let view = group_by_column(&columns(), &projects);
        let lane = view.lane(&"todo".into()).unwrap();
        let ids: Vec<_> = lane.projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_orphaned_status_lands_in_no_lane() {
        let projects = vec![project("1", "todo"), project("2", "X"), project("3", "done")];
        let view = group_by_column(&columns(), &projects);
        assert_eq!(view.placed(), projects.len() - 1);
        assert_eq!(view.unmatched.len(), 1);
        assert_eq!(view.unmatched[0].id.as_str(), "2");
    }

    #[test]
    fn test_unmatched_keeps_store_order() {
        let projects = vec![project("1", "x"), project("2", "y"), project("3", "x")];
        let view = group_by_column(&columns(), &projects);
        let ids: Vec<_> = view.unmatched.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_plan_drop_same_column_is_noop() {
        let p = project("1", "todo");
        assert!(plan_drop(&p, &"todo".into()).is_none());
        assert_eq!(plan_drop(&p, &"done".into()), Some(ProjectPatch::move_to("done")));
    }

    #[test]
    fn test_drag_lifecycle() {
        let mut drag = DragState::default();
        drag.hover("todo".into());
        assert_eq!(drag, DragState::Idle);

        drag.start("1".into());
        drag.hover("doing".into());
        assert_eq!(drag.hovered().map(|c| c.as_str()), Some("doing"));
        drag.leave();
        assert!(drag.hovered().is_none());

        let intent = drag.drop_on("done".into()).unwrap();
        assert_eq!(intent.project.as_str(), "1");
        assert_eq!(intent.target.as_str(), "done");
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn test_drop_without_drag_does_nothing() {
        let mut drag = DragState::Idle;
        assert!(drag.drop_on("done".into()).is_none());
    }

    #[test]
    fn test_cancel_resets() {
        let mut drag = DragState::Idle;
        drag.start("1".into());
        drag.cancel();
        assert!(drag.dragged().is_none());
    }
}
