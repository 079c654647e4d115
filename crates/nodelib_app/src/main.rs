// SPDX-License-Identifier: MIT OR Apache-2.0
//! `nodelib` - capture and replay node graph selections
//!
//! Works on RON scene files holding compositor, shader and geometry node
//! graphs:
//! - Build graphs (`new-graph`, `add-node`)
//! - Capture a selection to JSON or the node library (`export`)
//! - Replay a document into another graph (`import`)
//! - Manage the node library (`list`, `show`, `remove`, `rename`)

mod commands;
mod config;

use clap::{Parser, Subcommand};
use commands::{AddNodeArgs, EntryArgs, ExportArgs, ImportArgs, ListArgs, NewGraphArgs, RenameArgs};
use config::{AppConfig, CONFIG_FILE_NAME};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "nodelib", version, about = "Capture and replay node graph selections")]
struct Cli {
    /// Settings file
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a graph in a scene file
    NewGraph(NewGraphArgs),
    /// Add a node to a graph
    AddNode(AddNodeArgs),
    /// Capture nodes into a snapshot document
    Export(ExportArgs),
    /// Replay a snapshot document into a graph
    Import(ImportArgs),
    /// List node library entries
    List(ListArgs),
    /// Print a node library entry
    Show(EntryArgs),
    /// Delete a node library entry
    Remove(EntryArgs),
    /// Rename a node library entry
    Rename(RenameArgs),
}

fn main() {
    // Logs go to stderr so exported documents can be piped
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "nodelib=info".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> commands::CommandResult {
    let config = AppConfig::load_or_default(&cli.config)?;
    tracing::debug!("Using node library at {}", config.library_dir.display());

    match cli.command {
        Commands::NewGraph(args) => commands::new_graph(args),
        Commands::AddNode(args) => commands::add_node(args),
        Commands::Export(args) => commands::export(args, &config),
        Commands::Import(args) => commands::import(args, &config),
        Commands::List(args) => commands::list(args, &config),
        Commands::Show(args) => commands::show(args, &config),
        Commands::Remove(args) => commands::remove(args, &config),
        Commands::Rename(args) => commands::rename(args, &config),
    }
}
