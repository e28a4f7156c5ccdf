mod commands;
mod host;
mod step;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rhtmx_nav::UserRole;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::step::Step;

#[derive(Parser)]
#[command(name = "rhtmx-nav")]
#[command(version, about = "RHTMX Nav - inspect route tables and replay navigation sessions", long_about = None)]
struct Cli {
    /// Log guard decisions, history and scroll bookkeeping
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List static routes (marking those the role may open) and dynamic patterns
    Routes {
        /// nav.toml to load (default: the standard route table)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Role to evaluate guards for
        #[arg(short, long)]
        role: Option<UserRole>,
    },

    /// Run navigation steps in order and print each outcome
    Simulate {
        /// nav.toml to load (default: the standard route table)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Role the session starts with
        #[arg(short, long)]
        role: Option<UserRole>,

        /// Print the session as JSON
        #[arg(long)]
        json: bool,

        /// back | forward | role=<role> | <section>.<name> | <section>.<name>:<k>=<v>[,<k>=<v>...]
        #[arg(required = true)]
        steps: Vec<Step>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Execute command
    match cli.command {
        Commands::Routes { config, role } => {
            commands::routes::execute(config.as_deref(), role).await?;
        }
        Commands::Simulate {
            config,
            role,
            json,
            steps,
        } => {
            commands::simulate::execute(config.as_deref(), role, &steps, json).await?;
        }
    }

    Ok(())
}
