//! Terminal output of records and statistics using `prettytable`.
//!
//! Values pass through [`format_cell`] so stored ISO dates print as
//! `DD.MM.YYYY`, and column names through [`format_header`].

use super::formatter::{format_cell, format_header};
use crate::db::record::{Record, RecordSet};
use crate::db::stats::{DashboardMetrics, LabelCount};
use anyhow::Result;
use prettytable::{Cell, Row, Table};

pub struct View {}

impl View {
    /// Prints a listing with one column per selected field.
    pub fn records(records: &RecordSet) -> Result<()> {
        Self::records_table(records).printstd();
        Ok(())
    }

    /// Builds the listing table without printing it.
    pub fn records_table(records: &RecordSet) -> Table {
        let mut table = Table::new();
        table.set_titles(Row::new(records.columns().iter().map(|column| Cell::new(&format_header(column))).collect()));
        for record in records {
            table.add_row(Row::new(
                record.display_values().iter().map(|value| Cell::new(&format_cell(value))).collect(),
            ));
        }
        table
    }

    /// Prints a single record as field/value pairs.
    pub fn record(record: &Record) -> Result<()> {
        let mut table = Table::new();
        for (column, value) in record.columns().iter().zip(record.display_values()) {
            table.add_row(Row::new(vec![Cell::new(&format_header(column)), Cell::new(&format_cell(&value))]));
        }
        table.printstd();
        Ok(())
    }

    /// Prints a two-column table of grouped counts.
    ///
    /// # Arguments
    ///
    /// * `label` - Heading of the group column, e.g. `"genre"`
    /// * `counts` - Rows in the order they should appear
    pub fn counts(label: &str, counts: &[LabelCount]) -> Result<()> {
        let mut table = Table::new();
        table.set_titles(Row::new(vec![Cell::new(&format_header(label)), Cell::new("COUNT")]));
        for entry in counts {
            table.add_row(Row::new(vec![Cell::new(&entry.label), Cell::new(&entry.count.to_string())]));
        }
        table.printstd();
        Ok(())
    }

    /// Prints the summary figures, then one count table per grouping, then
    /// upcoming performances when there are any.
    pub fn dashboard(metrics: &DashboardMetrics) -> Result<()> {
        let mut summary = Table::new();
        summary.add_row(Row::new(vec![
            Cell::new("REHEARSALS"),
            Cell::new(&metrics.rehearsals_count.to_string()),
        ]));
        summary.add_row(Row::new(vec![Cell::new("ROLES"), Cell::new(&metrics.total_roles.to_string())]));
        summary.printstd();

        Self::counts("month", &metrics.rehearsals_by_month)?;
        Self::counts("genre", &metrics.plays_by_genre)?;
        Self::counts("theatre", &metrics.productions_by_theatre)?;
        Self::counts("director", &metrics.productions_by_director)?;
        if !metrics.upcoming.is_empty() {
            Self::records(&metrics.upcoming)?;
        }
        Ok(())
    }
}
