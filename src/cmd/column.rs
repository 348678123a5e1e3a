//! Column commands: `nightwing column`. Columns live on this device only,
//! so none of these touch the project service.

use anyhow::Result;
use console::style;
use nightwing_common::{ColumnColor, ColumnId, ColumnPatch};
use nightwing::ui::icons::CHECK;
use nightwing::ui::render_columns;

use super::Context;
use crate::{Cli, ColumnCommands};

fn parse_color(raw: &str) -> Result<ColumnColor> {
    raw.parse::<ColumnColor>().map_err(anyhow::Error::msg)
}

pub fn cmd_column(ctx: &Context, cli: &Cli, command: Option<ColumnCommands>) -> Result<()> {
    use dialoguer::Confirm;

    let session = ctx.open_session()?;

    match command {
        None | Some(ColumnCommands::List) => {
            let columns = session.columns();
            if columns.is_empty() {
                println!("No columns.");
            } else {
                print!("{}", render_columns(&columns));
            }
        }
        Some(ColumnCommands::Add { name, color }) => {
            let column = session.create_column(&name, parse_color(&color)?)?;
            println!(
                "{}Created column {} ({})",
                CHECK,
                style(&column.name).bold(),
                column.id
            );
        }
        Some(ColumnCommands::Edit { id, name, color }) => {
            let patch = ColumnPatch {
                name,
                color: color.as_deref().map(parse_color).transpose()?,
                order: None,
            };
            if patch.name.is_none() && patch.color.is_none() {
                anyhow::bail!("Nothing to change. Pass --name or --color.");
            }
            let column = session.update_column(&ColumnId::from(id), &patch)?;
            println!("{}Updated column {}", CHECK, style(&column.name).bold());
        }
        Some(ColumnCommands::Rm { id }) => {
            let id = ColumnId::from(id);
            if !cli.yes {
                let confirm = Confirm::new()
                    .with_prompt(format!(
                        "Delete column '{}'? Its projects stay in the service but leave the board.",
                        id
                    ))
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if !confirm {
                    println!("Delete cancelled");
                    return Ok(());
                }
            }

            if session.delete_column(&id)? {
                println!("{}Deleted column {}", CHECK, style(&id).bold());
            } else {
                println!("No column {}; nothing deleted.", id);
            }
        }
        Some(ColumnCommands::Move { id, position }) => {
            let columns = session.reorder_column(&ColumnId::from(id), position)?;
            print!("{}", render_columns(&columns));
        }
    }

    Ok(())
}
