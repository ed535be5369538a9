//! CSV import
//!
//! Reads a headed CSV with `date`, `description`, `amount` and an optional
//! `category` column into [`RawRow`]s. Only the structure of the file is
//! checked here; field values are validated by the normalizer.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{RawAmount, RawRow};

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    description: usize,
    amount: usize,
    category: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers.iter().position(|h| {
                h.trim_start_matches('\u{feff}')
                    .trim()
                    .eq_ignore_ascii_case(name)
            })
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| Error::InvalidData(format!("Missing column: {}", name)))
        };

        Ok(Self {
            date: require("date")?,
            description: require("description")?,
            amount: require("amount")?,
            category: find("category"),
        })
    }
}

/// Rows read from a CSV file, with the source line each one started on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvImport {
    pub rows: Vec<RawRow>,
    /// 1-based line numbers, parallel to `rows`
    pub lines: Vec<u64>,
}

impl CsvImport {
    /// Source line of the row at `index`
    pub fn line_of(&self, index: usize) -> Option<u64> {
        self.lines.get(index).copied()
    }
}

/// Read transaction rows from CSV data, tracking source lines
pub fn read_csv<R: Read>(reader: R) -> Result<CsvImport> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut import = CsvImport::default();

    for result in rdr.records() {
        let record = result?;

        // Short rows become empty fields so the normalizer reports them
        let field = |i: usize| record.get(i).unwrap_or("").to_string();

        let line = record.position().map(|p| p.line()).unwrap_or_default();
        import.lines.push(line);
        import.rows.push(RawRow {
            date: field(columns.date),
            description: field(columns.description),
            amount: RawAmount::Text(field(columns.amount)),
            category: columns.category.map(field).unwrap_or_default(),
        });
    }

    debug!("Read {} rows from CSV", import.rows.len());
    Ok(import)
}

/// Read transaction rows from CSV data
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    Ok(read_csv(reader)?.rows)
}

/// Read transaction rows from a CSV file, tracking source lines
pub fn read_csv_from_path(path: &Path) -> Result<CsvImport> {
    let file = File::open(path)?;
    read_csv(file)
}

/// Read transaction rows from a CSV file
pub fn read_rows_from_path(path: &Path) -> Result<Vec<RawRow>> {
    Ok(read_csv_from_path(path)?.rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_rows() {
        let csv = r#"date,description,amount,category
2024-09-01,Netflix,15.99,Entertainment
2024-09-03,Whole Foods,82.13,Groceries"#;

        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            RawRow::new("2024-09-01", "Netflix", "15.99", "Entertainment")
        );
        assert_eq!(rows[1].description, "Whole Foods");
    }

    #[test]
    fn test_read_rows_any_column_order_and_case() {
        let csv = "Amount, Description ,Category,DATE\n9.99,Spotify,Music,2024-01-05\n";

        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0], RawRow::new("2024-01-05", "Spotify", "9.99", "Music"));
    }

    #[test]
    fn test_read_rows_without_category_column() {
        let csv = "date,description,amount\n2024-01-05,Spotify,9.99\n";

        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].category, "");
    }

    #[test]
    fn test_read_rows_quoted_fields() {
        let csv = "date,description,amount,category\n2024-01-05,\"Acme, Inc.\",\"1,200.00\",Rent\n";

        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].description, "Acme, Inc.");
        assert_eq!(rows[0].amount, RawAmount::Text("1,200.00".to_string()));
    }

    #[test]
    fn test_read_rows_short_row_keeps_position() {
        let csv = "date,description,amount,category\n2024-01-05,Spotify\n";

        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, RawAmount::Text(String::new()));
    }

    #[test]
    fn test_read_csv_tracks_source_lines() {
        let csv = "date,description,amount,category\n\
2024-01-05,\"Spotify\nPremium\",9.99,Music\n\
2024-02-05,Spotify,9.99,Music\n";

        let import = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(import.rows.len(), 2);
        assert_eq!(import.rows[0].description, "Spotify\nPremium");
        // The quoted newline pushes the second record to line 4
        assert_eq!(import.lines, vec![2, 4]);
        assert_eq!(import.line_of(1), Some(4));
        assert_eq!(import.line_of(2), None);
    }

    #[test]
    fn test_read_rows_missing_required_column() {
        let csv = "date,memo,amount\n2024-01-05,Spotify,9.99\n";

        let err = read_rows(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidData(ref m) if m.contains("description")));
    }

    #[test]
    fn test_read_rows_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.csv");
        std::fs::write(&path, "date,description,amount\n2024-01-05,Spotify,9.99\n").unwrap();

        let rows = read_rows_from_path(&path).unwrap();
        assert_eq!(rows.len(), 1);

        assert!(matches!(
            read_rows_from_path(&dir.path().join("missing.csv")),
            Err(Error::Io(_))
        ));
    }
}
