//! Export of listings and the analytics report to CSV, JSON and Excel.
//!
//! A listing is one [`RecordSet`] and becomes one file in any format. The
//! analytics report ([`ReportData`]) has several sections:
//!
//! - **Excel**: one workbook with a `Data` sheet (productions), an
//!   `Analytics` sheet (genres and theatres with a column and a pie chart) and
//!   a `Visualization` sheet (rehearsals by month and directors with a line
//!   and a column chart). Actors are appended to the `Data` sheet.
//! - **JSON**: one document keyed by section, plus the export timestamp.
//! - **CSV**: one file per section, named `<stem>_<section>.csv`.
//!
//! Without an explicit output path, files are named
//! `<name>_<YYYYmmdd_HHMMSS>.<ext>` inside the configured reports directory.

use crate::db::record::{Record, RecordSet};
use crate::db::stats::ReportData;
use crate::libs::messages::Message;
use crate::{msg_error_anyhow, msg_success};
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use rusqlite::types::Value;
use rust_xlsxwriter::{Chart, ChartType, Color, Format, Workbook, Worksheet};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const DATA_SHEET: &str = "Data";
const ANALYTICS_SHEET: &str = "Analytics";
const VISUALIZATION_SHEET: &str = "Visualization";

/// Row gap between stacked tables on one sheet.
const TABLE_GAP: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

/// `<name>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn default_file_name(name: &str, format: ExportFormat, at: NaiveDateTime) -> String {
    format!("{}_{}.{}", name, at.format("%Y%m%d_%H%M%S"), format.extension())
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// Uses `output_path` as given, or a timestamped file in `reports_dir`.
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>, name: &str, reports_dir: &Path) -> Self {
        let output_path = output_path
            .unwrap_or_else(|| reports_dir.join(default_file_name(name, format, Local::now().naive_local())));
        Self { format, output_path }
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes one listing and returns the file written.
    pub fn export_records(&self, sheet: &str, records: &RecordSet) -> Result<PathBuf> {
        prepare_dir(&self.output_path)?;
        match self.format {
            ExportFormat::Csv => write_csv(&self.output_path, records)?,
            ExportFormat::Json => write_json(&self.output_path, records)?,
            ExportFormat::Excel => {
                let mut workbook = Workbook::new();
                let mut worksheet = Worksheet::new();
                worksheet.set_name(sheet)?;
                let last_row = write_table(&mut worksheet, 0, records, &header_format())?;
                if !records.is_empty() && !records.columns().is_empty() {
                    worksheet.set_freeze_panes(1, 0)?;
                    worksheet.autofilter(0, 0, last_row, (records.columns().len() - 1) as u16)?;
                }
                worksheet.autofit();
                workbook.push_worksheet(worksheet);
                workbook.save(&self.output_path)?;
            }
        }

        tracing::info!(path = %self.output_path.display(), rows = records.len(), "listing exported");
        msg_success!(Message::ExportCompleted(self.output_path.display().to_string()));
        Ok(self.output_path.clone())
    }

    /// Writes the analytics report and returns every file written.
    pub fn export_report(&self, report: &ReportData) -> Result<Vec<PathBuf>> {
        prepare_dir(&self.output_path)?;
        let written = match self.format {
            ExportFormat::Csv => self.report_csv(report)?,
            ExportFormat::Json => {
                let document = ReportDocument {
                    export_date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                    report,
                };
                write_json(&self.output_path, &document)?;
                vec![self.output_path.clone()]
            }
            ExportFormat::Excel => {
                report_workbook(report)?.save(&self.output_path)?;
                vec![self.output_path.clone()]
            }
        };

        tracing::info!(files = written.len(), "report exported");
        for path in &written {
            msg_success!(Message::ExportCompleted(path.display().to_string()));
        }
        Ok(written)
    }

    fn report_csv(&self, report: &ReportData) -> Result<Vec<PathBuf>> {
        let stem = self
            .output_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| msg_error_anyhow!(Message::InvalidExportPath(self.output_path.display().to_string())))?;
        let dir = self.output_path.parent().map(Path::to_path_buf).unwrap_or_default();

        let mut written = Vec::new();
        for (section, records) in report.sections() {
            let path = dir.join(format!("{}_{}.csv", stem, section));
            write_csv(&path, records)?;
            written.push(path);
        }
        Ok(written)
    }
}

fn prepare_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    export_date: String,
    #[serde(flatten)]
    report: &'a ReportData,
}

fn write_csv(path: &Path, records: &RecordSet) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(records.columns())?;
    for record in records {
        writer.write_record(record.display_values())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

fn header_format() -> Format {
    Format::new().set_bold().set_background_color(Color::Gray)
}

/// Writes a header row and the records below it, starting at `start_row`.
/// Returns the index of the last row written.
fn write_table(worksheet: &mut Worksheet, start_row: u32, records: &RecordSet, header: &Format) -> Result<u32> {
    for (col, name) in records.columns().iter().enumerate() {
        worksheet.write_string_with_format(start_row, col as u16, name, header)?;
    }

    let mut row = start_row;
    for record in records {
        row += 1;
        write_record(worksheet, row, record)?;
    }
    Ok(row)
}

fn write_record(worksheet: &mut Worksheet, row: u32, record: &Record) -> Result<()> {
    for (col, value) in record.values().iter().enumerate() {
        let col = col as u16;
        match value {
            Value::Null => {}
            Value::Integer(number) => {
                worksheet.write_number(row, col, *number as f64)?;
            }
            Value::Real(number) => {
                worksheet.write_number(row, col, *number)?;
            }
            Value::Text(text) => {
                worksheet.write_string(row, col, text)?;
            }
            Value::Blob(bytes) => {
                worksheet.write_string(row, col, format!("<{} bytes>", bytes.len()))?;
            }
        }
    }
    Ok(())
}

/// Placement of one table on a sheet, used to point charts at its cells.
struct TablePlacement {
    header_row: u32,
    last_row: u32,
}

impl TablePlacement {
    fn has_data(&self) -> bool {
        self.last_row > self.header_row
    }
}

fn place_table(worksheet: &mut Worksheet, start_row: u32, records: &RecordSet, header: &Format) -> Result<TablePlacement> {
    let last_row = write_table(worksheet, start_row, records, header)?;
    Ok(TablePlacement {
        header_row: start_row,
        last_row,
    })
}

fn column_index(records: &RecordSet, column: &str) -> Option<u16> {
    records.columns().iter().position(|name| name == column).map(|index| index as u16)
}

/// Builds a single-series chart over a table already written to `sheet`.
fn series_chart(
    chart_type: ChartType,
    title: &str,
    sheet: &str,
    placement: &TablePlacement,
    records: &RecordSet,
    label_column: &str,
    value_column: &str,
) -> Option<Chart> {
    if !placement.has_data() {
        return None;
    }
    let label_col = column_index(records, label_column)?;
    let value_col = column_index(records, value_column)?;
    let first = placement.header_row + 1;

    let mut chart = Chart::new(chart_type);
    chart.title().set_name(title);
    chart
        .add_series()
        .set_name(value_column)
        .set_categories((sheet, first, label_col, placement.last_row, label_col))
        .set_values((sheet, first, value_col, placement.last_row, value_col));
    Some(chart)
}

fn report_workbook(report: &ReportData) -> Result<Workbook> {
    let header = header_format();
    let mut workbook = Workbook::new();

    let mut data = Worksheet::new();
    data.set_name(DATA_SHEET)?;
    let productions = place_table(&mut data, 0, &report.productions, &header)?;
    if productions.has_data() {
        data.set_freeze_panes(1, 0)?;
    }
    place_table(&mut data, productions.last_row + 1 + TABLE_GAP, &report.actors, &header)?;
    data.autofit();
    workbook.push_worksheet(data);

    let mut analytics = Worksheet::new();
    analytics.set_name(ANALYTICS_SHEET)?;
    let genres = place_table(&mut analytics, 0, &report.genres, &header)?;
    let theatres = place_table(&mut analytics, genres.last_row + 1 + TABLE_GAP, &report.theatres, &header)?;
    let chart_col = report.genres.columns().len().max(report.theatres.columns().len()) as u16 + 1;
    if let Some(chart) = series_chart(
        ChartType::Column,
        "Productions by genre",
        ANALYTICS_SHEET,
        &genres,
        &report.genres,
        "genre",
        "productions_count",
    ) {
        analytics.insert_chart(0, chart_col, &chart)?;
    }
    if let Some(chart) = series_chart(
        ChartType::Pie,
        "Performances by theatre",
        ANALYTICS_SHEET,
        &theatres,
        &report.theatres,
        "theatre_name",
        "performances_count",
    ) {
        analytics.insert_chart(theatres.header_row, chart_col, &chart)?;
    }
    analytics.autofit();
    workbook.push_worksheet(analytics);

    let mut visualization = Worksheet::new();
    visualization.set_name(VISUALIZATION_SHEET)?;
    let months = place_table(&mut visualization, 0, &report.rehearsals_by_month, &header)?;
    let directors = place_table(&mut visualization, months.last_row + 1 + TABLE_GAP, &report.directors, &header)?;
    let chart_col = report
        .rehearsals_by_month
        .columns()
        .len()
        .max(report.directors.columns().len()) as u16
        + 1;
    if let Some(chart) = series_chart(
        ChartType::Line,
        "Rehearsals by month",
        VISUALIZATION_SHEET,
        &months,
        &report.rehearsals_by_month,
        "month",
        "rehearsals_count",
    ) {
        visualization.insert_chart(0, chart_col, &chart)?;
    }
    if let Some(chart) = series_chart(
        ChartType::Column,
        "Productions by director",
        VISUALIZATION_SHEET,
        &directors,
        &report.directors,
        "director_name",
        "productions_count",
    ) {
        visualization.insert_chart(directors.header_row, chart_col, &chart)?;
    }
    visualization.autofit();
    workbook.push_worksheet(visualization);

    Ok(workbook)
}
