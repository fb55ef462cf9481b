use crate::{
    db::{query::ListOptions, registry::Entity},
    libs::export::{ExportFormat, Exporter},
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(value_enum)]
    entity: Entity,

    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,

    /// Output file; defaults to a timestamped file in the reports directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export only rows matching this text
    #[arg(short = 'q', long)]
    search: Option<String>,

    #[arg(short, long)]
    sort: Option<String>,

    #[arg(long)]
    desc: bool,
}

pub async fn cmd(args: ExportArgs) -> Result<()> {
    let (config, db) = super::open()?;
    let options = ListOptions {
        sort_column: args.sort,
        ascending: !args.desc,
        force_refresh: true,
    };

    let records = match args.search.as_deref() {
        Some(text) => db.search(args.entity, text, &options).await?,
        None => db.list(args.entity, &options).await?,
    };

    let exporter = Exporter::new(args.format, args.output, args.entity.name(), &config.reports_dir);
    exporter.export_records(args.entity.name(), &records)?;
    Ok(())
}
