//! Degradation Controller: decides what a failed remote call means for the
//! board.
//!
//! Each remote-dependent operation moves `Idle → Pending → Succeeded|Failed`.
//! On success any notice is cleared. On failure the active [`FallbackPolicy`]
//! picks between applying a locally synthesized result and rejecting the
//! action with a notice. Notices never block the board and can be dismissed
//! at any time.
//!
//! | Policy       | `RemoteUnreachable`                        | Anything else     |
//! |--------------|--------------------------------------------|-------------------|
//! | `Strict`     | reject, error notice                       | reject, error     |
//! | `Optimistic` | apply locally (load also shows a warning)  | reject, error     |

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use nightwing_common::ProjectId;
use serde::{Deserialize, Serialize};

use crate::errors::{BoardError, BoardResult};

/// How the board behaves when the project service is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Keep local state identical to the service; surface the failure.
    #[default]
    Strict,
    /// Offline mode: apply the change locally and carry on.
    Optimistic,
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackPolicy::Strict => write!(f, "strict"),
            FallbackPolicy::Optimistic => write!(f, "optimistic"),
        }
    }
}

impl FromStr for FallbackPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(FallbackPolicy::Strict),
            "optimistic" | "offline" => Ok(FallbackPolicy::Optimistic),
            _ => anyhow::bail!(
                "Invalid fallback policy '{}'. Valid values: strict, optimistic",
                s
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Load,
    Create,
    Update,
    Delete,
}

impl OpKind {
    fn verb(&self) -> &'static str {
        match self {
            OpKind::Load => "load projects",
            OpKind::Create => "create project",
            OpKind::Update => "update project",
            OpKind::Delete => "delete project",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// The one message the board is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// What to do with a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    ApplyLocal,
    Reject,
}

/// Proof that an operation was started. Consumed by `succeed`, `fail` or
/// `abandon`.
#[derive(Debug)]
#[must_use = "an operation must be resolved with succeed(), fail() or abandon()"]
pub struct Ticket {
    kind: OpKind,
    entity: Option<ProjectId>,
}

impl Ticket {
    pub fn kind(&self) -> OpKind {
        self.kind
    }
}

#[derive(Debug, Default)]
pub struct DegradationController {
    policy: FallbackPolicy,
    states: HashMap<OpKind, OpState>,
    in_flight: HashSet<ProjectId>,
    notice: Option<Notice>,
}

impl DegradationController {
    pub fn new(policy: FallbackPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: FallbackPolicy) {
        tracing::info!(%policy, "Fallback policy changed");
        self.policy = policy;
    }

    pub fn state(&self, kind: OpKind) -> OpState {
        self.states.get(&kind).copied().unwrap_or_default()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.notice = None;
    }

    pub fn is_in_flight(&self, id: &ProjectId) -> bool {
        self.in_flight.contains(id)
    }

    /// Start an operation. A second change to a project whose previous change
    /// has not resolved yet is rejected as `Busy`.
    pub fn begin(&mut self, kind: OpKind, entity: Option<&ProjectId>) -> BoardResult<Ticket> {
        if let Some(id) = entity {
            if !self.in_flight.insert(id.clone()) {
                return Err(BoardError::Busy { id: id.to_string() });
            }
        }
        self.states.insert(kind, OpState::Pending);
        Ok(Ticket {
            kind,
            entity: entity.cloned(),
        })
    }

    pub fn succeed(&mut self, ticket: Ticket) {
        self.release(&ticket);
        self.states.insert(ticket.kind, OpState::Succeeded);
        self.notice = None;
    }

    /// Resolve a failed operation and say whether a local result may stand in
    /// for the service's answer.
    pub fn fail(&mut self, ticket: Ticket, err: &BoardError) -> Fallback {
        self.release(&ticket);
        self.states.insert(ticket.kind, OpState::Failed);

        if self.policy == FallbackPolicy::Optimistic && err.is_unreachable() {
            tracing::warn!(op = ticket.kind.verb(), error = %err, "Service unreachable, applying locally");
            if ticket.kind == OpKind::Load {
                self.notice = Some(Notice {
                    level: NoticeLevel::Warning,
                    message: format!(
                        "Project service is unreachable ({}). Showing example data; changes stay on this device.",
                        err
                    ),
                });
            }
            return Fallback::ApplyLocal;
        }

        tracing::warn!(op = ticket.kind.verb(), error = %err, "Remote operation rejected");
        self.report(err);
        Fallback::Reject
    }

    /// Surface an error that never reached the service (validation, unknown
    /// column, busy).
    pub fn report(&mut self, err: &BoardError) {
        self.notice = Some(Notice {
            level: NoticeLevel::Error,
            message: err.to_string(),
        });
    }

    /// Resolve an operation whose caller went away before the service
    /// answered. Nothing was applied, so the op is back to `Idle` and the
    /// project can be changed again.
    pub fn abandon(&mut self, ticket: Ticket) {
        self.release(&ticket);
        self.states.insert(ticket.kind, OpState::Idle);
        tracing::debug!(op = ticket.kind.verb(), "Remote operation cancelled");
    }

    fn release(&mut self, ticket: &Ticket) {
        if let Some(id) = &ticket.entity {
            self.in_flight.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable() -> BoardError {
        BoardError::RemoteUnreachable("connection refused".into())
    }

    #[test]
    fn test_policy_parse_and_display() {
        assert_eq!("strict".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Strict);
        assert_eq!("Optimistic".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Optimistic);
        assert_eq!("offline".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Optimistic);
        assert!("maybe".parse::<FallbackPolicy>().is_err());
        assert_eq!(FallbackPolicy::Optimistic.to_string(), "optimistic");
        assert_eq!(FallbackPolicy::default(), FallbackPolicy::Strict);
    }

    #[test]
    fn test_state_machine_transitions() {
        let mut ctl = DegradationController::new(FallbackPolicy::Strict);
        assert_eq!(ctl.state(OpKind::Create), OpState::Idle);

        let ticket = ctl.begin(OpKind::Create, None).unwrap();
        assert_eq!(ctl.state(OpKind::Create), OpState::Pending);
        ctl.succeed(ticket);
        assert_eq!(ctl.state(OpKind::Create), OpState::Succeeded);

        let ticket = ctl.begin(OpKind::Create, None).unwrap();
        ctl.fail(ticket, &unreachable());
        assert_eq!(ctl.state(OpKind::Create), OpState::Failed);
    }

    #[test]
    fn test_strict_rejects_and_surfaces_one_error() {
        let mut ctl = DegradationController::new(FallbackPolicy::Strict);
        let ticket = ctl.begin(OpKind::Create, None).unwrap();
        assert_eq!(ctl.fail(ticket, &unreachable()), Fallback::Reject);
        let notice = ctl.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("unreachable"));

        let ticket = ctl.begin(OpKind::Create, None).unwrap();
        ctl.succeed(ticket);
        assert!(ctl.notice().is_none());
    }

    #[test]
    fn test_optimistic_applies_locally_only_when_unreachable() {
        let mut ctl = DegradationController::new(FallbackPolicy::Optimistic);
        let ticket = ctl.begin(OpKind::Update, Some(&"1".into())).unwrap();
        assert_eq!(ctl.fail(ticket, &unreachable()), Fallback::ApplyLocal);
        assert!(ctl.notice().is_none());

        let ticket = ctl.begin(OpKind::Update, Some(&"1".into())).unwrap();
        let not_found = BoardError::ProjectNotFound { id: "1".into() };
        assert_eq!(ctl.fail(ticket, &not_found), Fallback::Reject);
        assert_eq!(ctl.notice().unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn test_optimistic_load_failure_warns() {
        let mut ctl = DegradationController::new(FallbackPolicy::Optimistic);
        let ticket = ctl.begin(OpKind::Load, None).unwrap();
        assert_eq!(ctl.fail(ticket, &unreachable()), Fallback::ApplyLocal);
        assert_eq!(ctl.notice().unwrap().level, NoticeLevel::Warning);
    }

    #[test]
    fn test_second_change_to_same_project_is_busy() {
        let mut ctl = DegradationController::new(FallbackPolicy::Strict);
        let id = ProjectId::new("7");
        let first = ctl.begin(OpKind::Update, Some(&id)).unwrap();
        assert!(ctl.is_in_flight(&id));
        let err = ctl.begin(OpKind::Delete, Some(&id)).unwrap_err();
        assert!(matches!(err, BoardError::Busy { .. }));

        // Other projects are unaffected.
        let other = ctl.begin(OpKind::Update, Some(&"8".into())).unwrap();
        ctl.succeed(other);

        ctl.succeed(first);
        assert!(!ctl.is_in_flight(&id));
        assert!(ctl.begin(OpKind::Delete, Some(&id)).is_ok());
    }

    #[test]
    fn test_abandon_releases_project_and_returns_to_idle() {
        let mut ctl = DegradationController::new(FallbackPolicy::Strict);
        let id = ProjectId::new("7");
        let ticket = ctl.begin(OpKind::Update, Some(&id)).unwrap();
        ctl.abandon(ticket);
        assert!(!ctl.is_in_flight(&id));
        assert_eq!(ctl.state(OpKind::Update), OpState::Idle);
        assert!(ctl.notice().is_none());
        assert!(ctl.begin(OpKind::Delete, Some(&id)).is_ok());
    }

    #[test]
    fn test_dismiss_clears_notice_regardless_of_cause() {
        let mut ctl = DegradationController::new(FallbackPolicy::Strict);
        ctl.report(&BoardError::Validation("name must not be empty".into()));
        assert!(ctl.notice().is_some());
        ctl.dismiss();
        assert!(ctl.notice().is_none());
    }
}
