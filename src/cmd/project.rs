//! Board and project commands: `nightwing board`, `nightwing project`.

use anyhow::{Context as _, Result};
use console::style;
use nightwing::board::{BoardSession, OpKind, OpState};
use nightwing::ui::icons::{CHECK, OFFLINE};
use nightwing::ui::{render_board, render_notice, render_project};
use nightwing_common::{ColumnId, ProjectDraft, ProjectId, ProjectPatch};

use super::Context;
use crate::ProjectCommands;

/// Render the board. A failed load still renders (empty, or the example
/// data in offline mode) with the notice on stderr.
pub async fn cmd_board(ctx: &Context) -> Result<()> {
    let session = ctx.open_session()?;

    if let Err(e) = session.load().await {
        tracing::debug!(error = %e, "Board load failed");
    }

    print!("{}", render_board(&session.board(), session.policy()));
    if let Some(notice) = session.notice() {
        eprintln!("{}", render_notice(&notice));
    }
    Ok(())
}

pub async fn cmd_project(ctx: &Context, command: ProjectCommands) -> Result<()> {
    let session = ctx.open_session()?;
    session.load().await.context("Failed to load projects")?;

    match command {
        ProjectCommands::Add {
            name,
            description,
            responsible,
            status,
        } => {
            let mut draft = ProjectDraft::new(name);
            if let Some(description) = description {
                draft = draft.description(description);
            }
            if let Some(responsible) = responsible {
                draft = draft.responsible(responsible);
            }
            if let Some(status) = status {
                draft = draft.status(status);
            }

            let project = session.create_project(draft).await?;
            note_local_only(&session, OpKind::Create);
            println!(
                "{}Created project {} in {}",
                CHECK,
                style(&project.id).bold(),
                project.status
            );
        }
        ProjectCommands::Edit {
            id,
            name,
            description,
            responsible,
            status,
        } => {
            let patch = ProjectPatch {
                name,
                description,
                responsible,
                status: status.map(ColumnId::from),
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to change. Pass --name, --description, --responsible or --status.");
            }

            let project = session.update_project(&ProjectId::from(id), patch).await?;
            note_local_only(&session, OpKind::Update);
            println!("{}Updated project {}", CHECK, style(&project.id).bold());
        }
        ProjectCommands::Move { id, column } => {
            let project = session
                .handle_drop(&ProjectId::from(id), &ColumnId::from(column))
                .await?;
            note_local_only(&session, OpKind::Update);
            println!(
                "{}Project {} is in {}",
                CHECK,
                style(&project.id).bold(),
                project.status
            );
        }
        ProjectCommands::Rm { id } => {
            let id = ProjectId::from(id);
            session.delete_project(&id).await?;
            note_local_only(&session, OpKind::Delete);
            println!("{}Deleted project {}", CHECK, style(&id).bold());
        }
        ProjectCommands::Show { id } => {
            let id = ProjectId::from(id);
            let project = session
                .project(&id)
                .with_context(|| format!("Project {} not found", id))?;
            print!("{}", render_project(&project));
        }
    }

    if let Some(notice) = session.notice() {
        eprintln!("{}", render_notice(&notice));
    }
    Ok(())
}

/// The change succeeded only because offline mode stood in for the service.
/// Nothing outlives this process in that case.
fn note_local_only(session: &BoardSession, kind: OpKind) {
    if session.op_state(kind) == OpState::Failed {
        eprintln!(
            "{}{}",
            OFFLINE,
            style("Project service unreachable; the change was applied locally only").yellow()
        );
    }
}
