//! akbo - API server and developer task runner
//!
//! Usage:
//!   akbo                      - Start the API server
//!   akbo serve [--port 8080]  - Start the API server
//!   akbo task [alias]         - Run a developer task (default: dev)
//!   akbo task --list          - List developer tasks

use std::path::PathBuf;

use akbo_app::commands::{ServeCommand, TaskCommand};
use clap::{Parser, Subcommand};
use shared::AppConfig;

#[derive(Parser)]
#[command(name = "akbo")]
#[command(about = "Akbo API server and developer tasks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to ./akbo.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve(ServeCommand),
    /// Run a developer task
    Task(TaskCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    akbo_app::logging::init(&config.log_level);

    match cli.command {
        Some(Commands::Serve(cmd)) => cmd.run(&config),
        Some(Commands::Task(cmd)) => {
            let code = cmd.run(&config)?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        // No subcommand - serve with config defaults
        None => ServeCommand::default().run(&config),
    }
}
