//! pagewright — propagate template edits to the pages of a static site.
//!
//! # Usage
//!
//! ```text
//! pagewright [--root DIR] [-v...] init
//! pagewright page create <uri> <template>
//! pagewright page remove <uri>
//! pagewright list [--json]
//! pagewright edit <template>
//! pagewright pending
//! pagewright templates
//! pagewright update [<template>] [--dry-run] [--strict|--lenient]
//! pagewright diff [<template>] [--strict|--lenient]
//! pagewright extract <uri>
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{
    diff::DiffArgs, edit::EditArgs, extract::ExtractArgs, init::InitArgs, list::ListArgs,
    page::PageCommand, pending::PendingArgs, templates::TemplatesArgs, update::UpdateArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "pagewright",
    version,
    about = "Propagate template edits to every page built from the template",
    long_about = None,
)]
struct Cli {
    /// Instance root directory.
    #[arg(long, global = true, env = "PAGEWRIGHT_ROOT", default_value = ".")]
    root: PathBuf,

    /// Log more (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new instance at the root directory.
    Init(InitArgs),

    /// Create or remove pages.
    Page {
        #[command(subcommand)]
        command: PageCommand,
    },

    /// List registered pages and their templates.
    List(ListArgs),

    /// Snapshot a template before editing it.
    Edit(EditArgs),

    /// Show templates with edits not yet propagated.
    Pending(PendingArgs),

    /// List every template with its status and page count.
    Templates(TemplatesArgs),

    /// Propagate pending template edits to their pages.
    Update(UpdateArgs),

    /// Show unified diff of what update would write.
    Diff(DiffArgs),

    /// Print the placeholder values extracted from a page, as JSON.
    Extract(ExtractArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let root = cli.root.as_path();
    match cli.command {
        Commands::Init(args) => args.run(root),
        Commands::Page { command } => commands::page::run(command, root),
        Commands::List(args) => args.run(root),
        Commands::Edit(args) => args.run(root),
        Commands::Pending(args) => args.run(root),
        Commands::Templates(args) => args.run(root),
        Commands::Update(args) => args.run(root),
        Commands::Diff(args) => args.run(root),
        Commands::Extract(args) => args.run(root),
    }
}

/// Install the stderr subscriber, keeping stdout for command output.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
