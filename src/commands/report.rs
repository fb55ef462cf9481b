use crate::{
    db::stats::ReportData,
    libs::export::{ExportFormat, Exporter},
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

const REPORT_NAME: &str = "theatre_report";

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[arg(short, long, value_enum, default_value = "excel")]
    format: ExportFormat,

    /// Output file; CSV reports write one file per section next to it
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn cmd(args: ReportArgs) -> Result<()> {
    let (config, db) = super::open()?;
    let report = ReportData::gather(&db).await?;

    Exporter::new(args.format, args.output, REPORT_NAME, &config.reports_dir).export_report(&report)?;
    Ok(())
}
