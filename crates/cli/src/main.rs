//! `flowgrid` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`    — start the API server.
//! - `migrate`  — run pending database migrations.
//! - `validate` — validate a workflow graph JSON file.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use components::{InvokerRegistry, NoSecrets};
use engine::{Scheduler, SchedulerConfig};

#[derive(Parser)]
#[command(
    name = "flowgrid",
    about = "Multi-tenant workflow execution engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST API server.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        #[arg(long, env = "DATABASE_URL", default_value = "sqlite://flowgrid.db")]
        database_url: String,
    },
    /// Run pending database migrations.
    Migrate {
        #[arg(long, env = "DATABASE_URL", default_value = "sqlite://flowgrid.db")]
        database_url: String,
    },
    /// Validate a workflow graph JSON file.
    Validate {
        /// Path to the workflow JSON file.
        path: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind, database_url } => {
            let pool = ledger::pool::create_pool(&database_url, 10).await?;
            ledger::pool::run_migrations(&pool).await?;

            let scheduler = Scheduler::new(
                pool.clone(),
                Arc::new(InvokerRegistry::builtin()),
                Arc::new(NoSecrets),
                SchedulerConfig::default(),
            );

            info!("Starting API server on {bind}");
            api::serve(&bind, api::AppState { pool, scheduler }).await?;
        }
        Command::Migrate { database_url } => {
            info!("Running migrations against {database_url}");
            let pool = ledger::pool::create_pool(&database_url, 2).await?;
            ledger::pool::run_migrations(&pool).await?;
            info!("Migrations applied successfully");
        }
        Command::Validate { path } => {
            let content = std::fs::read_to_string(&path)?;
            let workflow: engine::Workflow = serde_json::from_str(&content)?;

            match engine::validate_graph(&workflow) {
                Ok(()) => {
                    let entries = engine::entry_nodes(&workflow);
                    println!("✅ Workflow is valid. Entry nodes: {entries:?}");
                }
                Err(e) => {
                    eprintln!("❌ Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
