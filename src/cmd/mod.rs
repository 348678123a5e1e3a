//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module    | Commands handled                     |
//! |-----------|--------------------------------------|
//! | `serve`   | `Serve`                              |
//! | `project` | `Board`, `Project`                   |
//! | `column`  | `Column`                             |
//! | `config`  | `Config`                             |

pub mod column;
pub mod config;
pub mod project;
pub mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use nightwing::board::{BoardSession, FallbackPolicy, FileStore, HttpRemote};
use nightwing::config::{BoardConfig, default_data_dir};

use crate::Cli;

pub use column::cmd_column;
pub use config::cmd_config;
pub use project::{cmd_board, cmd_project};
pub use serve::cmd_serve;

/// Resolved settings shared by every command: file, then env, then flags.
pub struct Context {
    pub data_dir: PathBuf,
    pub config: BoardConfig,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
        let mut config = BoardConfig::load_or_default(&data_dir)?
            .with_env(|key| std::env::var(key).ok())?;

        if let Some(url) = &cli.api_url {
            config.remote.base_url = url.clone();
        }
        if cli.offline {
            config.board.fallback = FallbackPolicy::Optimistic;
        }

        tracing::debug!(
            data_dir = %data_dir.display(),
            base_url = %config.remote.base_url,
            policy = %config.board.fallback,
            "Resolved configuration"
        );
        Ok(Self { data_dir, config })
    }

    /// A session over the on-disk column layout and the configured service.
    /// Projects are not fetched yet.
    pub fn open_session(&self) -> Result<BoardSession> {
        let store = FileStore::open(&self.data_dir)?;
        let timeout = self.config.request_timeout();
        let remote = HttpRemote::new(&self.config.remote.base_url, timeout)?;
        BoardSession::open(
            Arc::new(store),
            Arc::new(remote),
            self.config.board.fallback,
            timeout,
        )
        .context("Failed to open board")
    }
}
