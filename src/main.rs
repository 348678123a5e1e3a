use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;

#[derive(Parser)]
#[command(name = "nightwing")]
#[command(version, about = "Kanban board for projects kept in a remote project service")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    /// Directory holding nightwing.toml and the column layout
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the project service. Overrides nightwing.toml and NIGHTWING_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Offline mode: apply changes locally when the project service is unreachable
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the project service
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,

        /// Start without the sample projects
        #[arg(long)]
        empty: bool,
    },
    /// Show the board
    Board,
    /// Create, edit, move or delete projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Manage the board's columns (stored on this device)
    Column {
        #[command(subcommand)]
        command: Option<ColumnCommands>,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ProjectCommands {
    Add {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        responsible: Option<String>,
        /// Column id; defaults to the first column
        #[arg(short, long)]
        status: Option<String>,
    },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        responsible: Option<String>,
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Move a project to another column
    Move { id: String, column: String },
    Rm { id: String },
    Show { id: String },
}

#[derive(Subcommand, Clone)]
pub enum ColumnCommands {
    List,
    Add {
        name: String,
        /// gray, red, yellow, green, blue, indigo, purple or pink
        #[arg(short, long, default_value = "gray")]
        color: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },
    Rm { id: String },
    /// Move a column to a zero-based position
    Move { id: String, position: usize },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    Show,
    Validate,
    Init,
}

fn init_tracing(cli: &Cli) {
    let default_filter = match (&cli.command, cli.verbose) {
        (_, true) => "nightwing=debug,tower_http=debug",
        (Commands::Serve { .. }, false) => "nightwing=info,tower_http=info",
        _ => "nightwing=warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let json = std::env::var("NIGHTWING_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let fmt_layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli);

    let ctx = cmd::Context::from_cli(&cli)?;

    match &cli.command {
        Commands::Serve { host, port, empty } => {
            cmd::cmd_serve(&ctx, host.clone(), *port, *empty).await?;
        }
        Commands::Board => cmd::cmd_board(&ctx).await?,
        Commands::Project { command } => cmd::cmd_project(&ctx, command.clone()).await?,
        Commands::Column { command } => cmd::cmd_column(&ctx, &cli, command.clone())?,
        Commands::Config { command } => cmd::cmd_config(&ctx, command.clone())?,
    }

    Ok(())
}
