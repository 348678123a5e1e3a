//! Plain-terminal rendering of the board and its parts.
//!
//! Everything here returns a `String` so commands decide where it goes
//! (stdout for data, stderr for notices).

use std::fmt::Write;

use console::{Style, style};
use nightwing_common::{Column, ColumnColor, Project};

use crate::board::{BoardView, FallbackPolicy, Notice, NoticeLevel};
use crate::ui::icons::{CARD, CROSS, OFFLINE, ORPHAN, WARN};

/// Terminal style for a palette color.
pub fn color_style(color: ColumnColor) -> Style {
    let base = Style::new().bold();
    match color {
        ColumnColor::Gray => base.dim(),
        ColumnColor::Red => base.red(),
        ColumnColor::Yellow => base.yellow(),
        ColumnColor::Green => base.green(),
        ColumnColor::Blue => base.blue(),
        ColumnColor::Indigo => base.color256(61),
        ColumnColor::Purple => base.magenta(),
        ColumnColor::Pink => base.color256(205),
    }
}

fn card_line(out: &mut String, project: &Project) {
    let _ = write!(out, "  {}{}", CARD, style(&project.name).bold());
    if !project.responsible.is_empty() {
        let _ = write!(out, " {}", style(format!("@{}", project.responsible)).cyan());
    }
    let _ = writeln!(out, " {}", style(format!("#{}", project.id)).dim());
    if !project.description.is_empty() {
        let _ = writeln!(out, "      {}", style(&project.description).dim());
    }
}

/// Lanes in display order, followed by projects whose status has no column.
pub fn render_board(view: &BoardView, policy: FallbackPolicy) -> String {
    let mut out = String::new();

    if policy == FallbackPolicy::Optimistic {
        let _ = writeln!(out, "{}{}", OFFLINE, style("Offline mode: changes may stay local").yellow());
        let _ = writeln!(out);
    }

    if view.lanes.is_empty() {
        let _ = writeln!(out, "{}", style("No columns. Add one with `nightwing column add`.").dim());
    }

    for lane in &view.lanes {
        let header = format!("{} ({})", lane.column.name, lane.projects.len());
        let _ = writeln!(out, "{}", color_style(lane.column.color).apply_to(header));
        if lane.projects.is_empty() {
            let _ = writeln!(out, "  {}", style("(empty)").dim());
        }
        for project in &lane.projects {
            card_line(&mut out, project);
        }
        let _ = writeln!(out);
    }

    if !view.unmatched.is_empty() {
        let _ = writeln!(
            out,
            "{}{}",
            ORPHAN,
            style(format!("Not on the board ({})", view.unmatched.len())).yellow()
        );
        for project in &view.unmatched {
            let _ = writeln!(
                out,
                "  {}{} {} {}",
                CARD,
                style(&project.name).bold(),
                style(format!("status={}", project.status)).yellow(),
                style(format!("#{}", project.id)).dim()
            );
        }
    }

    out
}

pub fn render_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Warning => format!("{}{}", WARN, style(&notice.message).yellow()),
        NoticeLevel::Error => format!("{}{}", CROSS, style(&notice.message).red()),
    }
}

/// One row per column: display position, id, name, color.
pub fn render_columns(columns: &[Column]) -> String {
    let mut out = String::new();
    let width = columns.iter().map(|c| c.id.as_str().len()).max().unwrap_or(0);
    for (position, column) in columns.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<width$}  {}  {}",
            position,
            column.id.as_str(),
            color_style(column.color).apply_to(&column.name),
            style(column.color).dim(),
            width = width
        );
    }
    out
}

pub fn render_project(project: &Project) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style(&project.name).bold());
    let _ = writeln!(out, "  id:          {}", project.id);
    let _ = writeln!(out, "  status:      {}", project.status);
    let _ = writeln!(out, "  responsible: {}", project.responsible);
    let _ = writeln!(out, "  description: {}", project.description);
    let _ = writeln!(out, "  created:     {}", project.created_at.to_rfc3339());
    let _ = writeln!(out, "  updated:     {}", project.updated_at.to_rfc3339());
    out
}
