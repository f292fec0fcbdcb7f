//! CSV decoding into an in-memory table with header lookup.

use catalog_model::Platform;
use catalog_model::text::non_empty;

use crate::detect::normalize_header;
use crate::error::{IngestError, Result};

/// Maximum accepted CSV size (5 MiB).
pub const MAX_CSV_BYTES: usize = 5 * 1024 * 1024;

/// Decode UTF-8 input, dropping a leading byte-order mark.
pub fn decode_csv_bytes(bytes: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(bytes).map_err(|err| IngestError::InvalidEncoding {
        offset: err.valid_up_to(),
    })?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Header row plus trimmed data rows.
#[derive(Debug, Clone)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse CSV text. Rows may be ragged; blank rows are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());
        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
        if headers.iter().all(String::is_empty) {
            return Err(IngestError::Csv {
                line: Some(1),
                message: "header row is required".to_string(),
            });
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let values: Vec<String> = record.iter().map(|value| value.trim().to_string()).collect();
            if values.iter().all(String::is_empty) {
                continue;
            }
            rows.push(values);
        }
        if rows.is_empty() {
            return Err(IngestError::NoDataRows);
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            headers: &self.headers,
            values,
        })
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|header| header == name)
    }

    /// Fail unless every header in `required` is present.
    pub fn require(&self, platform: Platform, required: &[&str]) -> Result<()> {
        let missing: Vec<String> = required
            .iter()
            .filter(|header| !self.has_header(header))
            .map(|header| (*header).to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(IngestError::MissingHeaders { platform, missing })
        }
    }
}

/// One data row, addressed by header name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl<'a> Row<'a> {
    /// Cell under `header`; empty when the column or cell is absent.
    pub fn get(&self, header: &str) -> &'a str {
        self.headers
            .iter()
            .position(|candidate| candidate == header)
            .and_then(|index| self.values.get(index))
            .map_or("", String::as_str)
    }

    /// Non-empty cell under `header`.
    pub fn text(&self, header: &str) -> Option<String> {
        non_empty(self.get(header))
    }

    /// Every `(header, value)` pair in column order.
    pub fn cells(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.headers
            .iter()
            .zip(self.values.iter())
            .map(|(header, value)| (header.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bom_and_trims_cells() {
        let text = decode_csv_bytes("\u{feff}Name , SKU\n  Mug ,M-1\n,\n".as_bytes()).unwrap();
        let table = CsvTable::parse(text).unwrap();
        assert_eq!(table.headers(), ["Name", "SKU"]);
        assert_eq!(table.len(), 1);
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("Name"), "Mug");
        assert_eq!(row.get("Missing"), "");
        assert_eq!(row.text("SKU").as_deref(), Some("M-1"));
    }

    #[test]
    fn rejects_header_only_and_bad_utf8() {
        assert_eq!(CsvTable::parse("Name,SKU\n").unwrap_err(), IngestError::NoDataRows);
        assert_eq!(
            decode_csv_bytes(&[b'a', 0xff]).unwrap_err(),
            IngestError::InvalidEncoding { offset: 1 }
        );
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let table = CsvTable::parse("A,B,C\n1\n1,2,3,4\n").unwrap();
        let rows: Vec<Row<'_>> = table.rows().collect();
        assert_eq!(rows[0].get("C"), "");
        assert_eq!(rows[1].get("C"), "3");
    }

    #[test]
    fn require_lists_missing_headers() {
        let table = CsvTable::parse("Handle,Title\nmug,Mug\n").unwrap();
        assert_eq!(
            table.require(Platform::Shopify, &["Handle", "Variant SKU", "Variant Price"]),
            Err(IngestError::MissingHeaders {
                platform: Platform::Shopify,
                missing: vec!["Variant SKU".to_string(), "Variant Price".to_string()],
            })
        );
    }
}
