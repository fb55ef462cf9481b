//! Command-line interface.
//!
//! Each subcommand lives in its own module with an `Args` struct and a `cmd`
//! function. Commands read the configuration, open the database and call the
//! library API in [`crate::db`]; they add prompts and output, nothing else.

pub mod add;
pub mod delete;
pub mod edit;
pub mod export;
pub mod init;
pub mod link;
pub mod list;
pub mod migrations;
pub mod report;
pub mod show;
pub mod stats;

use crate::db::db::Db;
use crate::libs::config::Config;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configure the database location and reports directory")]
    Init(init::InitArgs),
    #[command(about = "List or search records of one kind")]
    List(list::ListArgs),
    #[command(about = "Show one record and what it is linked to")]
    Show(show::ShowArgs),
    #[command(about = "Add a record")]
    Add(add::AddArgs),
    #[command(about = "Edit a record")]
    Edit(edit::EditArgs),
    #[command(about = "Delete a record")]
    Delete(delete::DeleteArgs),
    #[command(about = "Replace casts, rehearsal attendance and authorship", arg_required_else_help = true)]
    Link(link::LinkArgs),
    #[command(about = "Export a listing to CSV, JSON or Excel")]
    Export(export::ExportArgs),
    #[command(about = "Write the analytics report")]
    Report(report::ReportArgs),
    #[command(about = "Show dashboard statistics")]
    Stats(stats::StatsArgs),
    #[command(about = "Inspect the database schema version", arg_required_else_help = true)]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(name = "curtain", author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::List(args) => list::cmd(args).await,
            Commands::Show(args) => show::cmd(args).await,
            Commands::Add(args) => add::cmd(args).await,
            Commands::Edit(args) => edit::cmd(args).await,
            Commands::Delete(args) => delete::cmd(args).await,
            Commands::Link(args) => link::cmd(args).await,
            Commands::Export(args) => export::cmd(args).await,
            Commands::Report(args) => report::cmd(args).await,
            Commands::Stats(args) => stats::cmd(args).await,
            Commands::Migrations(args) => migrations::cmd(args).await,
        }
    }
}

/// Reads the configuration and opens the database it points to.
pub(crate) fn open() -> Result<(Config, Db)> {
    let config = Config::read()?;
    let db = Db::open(&config.database)?;
    Ok((config, db))
}
