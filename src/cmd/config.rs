//! Configuration view and validation commands: `nightwing config`.

use anyhow::{Context as _, Result};
use nightwing::config::{BoardConfig, CONFIG_FILE};

use super::Context;
use crate::ConfigCommands;

pub fn cmd_config(ctx: &Context, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = ctx.data_dir.join(CONFIG_FILE);

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Nightwing Configuration");
            println!("=======================");
            println!();
            println!("Data directory: {}", ctx.data_dir.display());
            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No {} found; using defaults.", CONFIG_FILE);
            }
            println!();

            println!("Effective values (with env/CLI overrides):");
            let rendered =
                toml::to_string_pretty(&ctx.config).context("Failed to render configuration")?;
            for line in rendered.lines() {
                println!("  {}", line);
            }
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No {} found. Using defaults (valid).", CONFIG_FILE);
                return Ok(());
            }

            let file = BoardConfig::load(&config_path)?;
            let warnings = file.validate();

            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("{} already exists at {}", CONFIG_FILE, config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            BoardConfig::default().save(&config_path)?;

            println!("Created {} at {}", CONFIG_FILE, config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [remote] base_url, timeout_secs");
            println!("  - [board] fallback (\"strict\" or \"optimistic\")");
            println!("  - [server] host, port, cors_origin");
            println!();
        }
    }

    Ok(())
}
