//! In-memory CSV tables and their encoding.

use catalog_model::TargetPlatform;

use crate::error::{ExportError, Result};

/// One row being filled in; cells are addressed by column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    columns: &'static [&'static str],
    cells: Vec<String>,
}

impl CsvRow {
    fn new(columns: &'static [&'static str]) -> Self {
        Self {
            columns,
            cells: vec![String::new(); columns.len()],
        }
    }

    /// Set a cell. Column names come from the exporter's own header list.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        match self.columns.iter().position(|name| *name == column) {
            Some(index) => self.cells[index] = value.into(),
            None => debug_assert!(false, "unknown column '{column}'"),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|name| *name == column)?;
        Some(self.cells[index].as_str())
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// Header order plus rows for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub target: TargetPlatform,
    columns: &'static [&'static str],
    rows: Vec<CsvRow>,
}

impl ExportTable {
    pub fn new(target: TargetPlatform, columns: &'static [&'static str]) -> Self {
        Self {
            target,
            columns,
            rows: Vec::new(),
        }
    }

    /// An empty row with this table's columns.
    pub fn blank_row(&self) -> CsvRow {
        CsvRow::new(self.columns)
    }

    pub fn push(&mut self, row: CsvRow) {
        debug_assert_eq!(row.columns, self.columns);
        self.rows.push(row);
    }

    /// Append another table's rows; both must share the header list.
    pub fn append(&mut self, other: ExportTable) {
        debug_assert_eq!(self.columns, other.columns);
        self.rows.extend(other.rows);
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub fn rows(&self) -> &[CsvRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Vec<&str> {
        self.rows.iter().filter_map(|row| row.get(name)).collect()
    }

    /// Encode as UTF-8 CSV: header row first, `\n` line endings and
    /// quoting only where needed.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(self.columns)?;
        for row in &self.rows {
            writer.write_record(row.cells())?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| ExportError::Csv {
                message: err.to_string(),
            })?;
        String::from_utf8(bytes).map_err(|err| ExportError::Csv {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[&str] = &["Name", "Notes"];

    #[test]
    fn encodes_with_minimal_quoting() {
        let mut table = ExportTable::new(TargetPlatform::Wix, COLUMNS);
        let mut row = table.blank_row();
        row.set("Name", "Mug");
        row.set("Notes", "red, blue\nsecond line");
        table.push(row);
        assert_eq!(
            table.to_csv().unwrap(),
            "Name,Notes\nMug,\"red, blue\nsecond line\"\n"
        );
        assert_eq!(table.column("Name"), vec!["Mug"]);
    }
}
