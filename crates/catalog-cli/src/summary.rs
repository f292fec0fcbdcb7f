//! Terminal tables for findings, batch outcomes and the platform registry.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use catalog_core::{Capabilities, PipelineError};
use catalog_ingest::requires_weight_unit;
use catalog_validate::{Finding, Severity};

use crate::commands::{ExportItem, ExportSummary};

/// Status per product, then every finding and failure.
pub fn render_export_summary(summary: &ExportSummary) -> String {
    let mut out = String::new();
    if let Some(path) = &summary.written {
        out.push_str(&format!("Output: {}\n", path.display()));
    }
    out.push_str(&format!("{}\n", export_table(summary)));
    let has_details = summary
        .items
        .iter()
        .any(|item| item.outcome.is_err() || !item_findings(item).is_empty());
    if has_details {
        out.push_str(&format!("{}\n", findings_table(summary)));
    }
    if let Some(err) = &summary.batch_error {
        out.push_str(&format!("error: {err}\n"));
    }
    out
}

pub fn export_table(summary: &ExportSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Product"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Fatal"),
        header_cell("Advisory"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for item in &summary.items {
        let (status, rows, fatal, advisory) = match &item.outcome {
            Ok(result) => (
                Cell::new("exported").fg(Color::Green),
                Cell::new(result.table.len()),
                count_cell(0, Color::Red),
                count_cell(result.report.advisory_count(), Color::Yellow),
            ),
            Err(err) => (
                Cell::new(err.kind()).fg(Color::Red).add_attribute(Attribute::Bold),
                dim_cell("-"),
                count_cell(fatal_count(err), Color::Red),
                dim_cell("-"),
            ),
        };
        table.add_row(vec![
            Cell::new(item.index + 1),
            Cell::new(&item.label),
            status,
            rows,
            fatal,
            advisory,
        ]);
    }
    table.add_row(vec![
        dim_cell(""),
        Cell::new("TOTAL").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{}/{} exported",
            summary.success_count(),
            summary.items.len()
        ))
        .add_attribute(Attribute::Bold),
        Cell::new(summary.row_count()).add_attribute(Attribute::Bold),
        dim_cell(""),
        dim_cell(""),
    ]);
    table
}

/// Every finding and failure, one per row.
pub fn findings_table(summary: &ExportSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Severity"),
        header_cell("Rule"),
        header_cell("Field"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for item in &summary.items {
        for finding in item_findings(item) {
            table.add_row(vec![
                Cell::new(item.index + 1),
                severity_cell(finding.severity()),
                Cell::new(finding.rule_code()),
                Cell::new(finding.field_path()),
                Cell::new(finding.message()),
            ]);
        }
        if let Err(err) = &item.outcome
            && !matches!(err, PipelineError::Validation { .. })
        {
            table.add_row(vec![
                Cell::new(item.index + 1),
                Cell::new("Error").fg(Color::Red).add_attribute(Attribute::Bold),
                Cell::new(err.kind()),
                dim_cell("-"),
                Cell::new(err.to_string()),
            ]);
        }
    }
    table
}

/// Registry records as a table.
pub fn platforms_table<'a>(records: impl IntoIterator<Item = &'a Capabilities>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Platform",
        "Detect",
        "CSV import",
        "URL import",
        "Export",
        "Weight unit needed",
    ]);
    apply_table_style(&mut table);
    for record in records {
        let csv_unit = record.can_import_csv() && requires_weight_unit(record.platform);
        table.add_row(vec![
            Cell::new(record.platform.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            flag_cell(record.detect),
            flag_cell(record.can_import_csv()),
            flag_cell(record.can_import_url()),
            flag_cell(record.can_export()),
            flag_cell(csv_unit),
        ]);
    }
    table
}

fn item_findings(item: &ExportItem) -> Vec<&Finding> {
    match &item.outcome {
        Ok(result) => result.report.findings.iter().collect(),
        Err(PipelineError::Validation { source }) => source.findings.iter().collect(),
        Err(_) => Vec::new(),
    }
}

fn fatal_count(err: &PipelineError) -> usize {
    match err {
        PipelineError::Validation { source } => source.fatals().count(),
        _ => 1,
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    let color = match severity {
        Severity::Fatal => Color::Red,
        Severity::Advisory => Color::Yellow,
    };
    Cell::new(severity.label()).fg(color).add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("yes").fg(Color::Green)
    } else {
        dim_cell("-")
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
