//! Project service command: `nightwing serve`.

use anyhow::Result;
use nightwing::server::{self, ServerConfig};

use super::Context;

pub async fn cmd_serve(
    ctx: &Context,
    host: Option<String>,
    port: Option<u16>,
    empty: bool,
) -> Result<()> {
    let mut config = ServerConfig::from(&ctx.config.server);
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    config.empty = empty;

    server::start_server(config).await
}
