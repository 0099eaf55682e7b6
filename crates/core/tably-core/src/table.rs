//! Tabular loading and rendering
//!
//! A [`Table`] is an ordered set of named columns of equal length, loaded
//! wholesale from an uploaded byte stream. CSV is accepted everywhere; xlsx
//! is only reachable from the dictionary upload path.

use crate::{Result, TablyError};
use calamine::{Data, Reader, Xlsx};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;

/// A single scalar value in a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Missing value (empty CSV field, empty spreadsheet cell)
    Null,
    /// Free-form text
    Text(String),
    /// Numeric value
    Number(f64),
}

impl Cell {
    fn from_csv_field(field: &str) -> Self {
        if field.is_empty() {
            return Cell::Null;
        }
        match field.trim().parse::<f64>() {
            Ok(n) => Cell::Number(n),
            Err(_) => Cell::Text(field.to_string()),
        }
    }

    fn from_xlsx_data(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Null,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::Error(e) => Cell::Text(format!("#ERR:{:?}", e)),
            Data::DateTime(dt) => Cell::Text(dt.to_string()),
            Data::DateTimeIso(s) => Cell::Text(s.clone()),
            Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) => write!(f, "{}", format_number(*n)),
        }
    }
}

/// Render a float the way a person would write it: no trailing `.0` for
/// whole numbers
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// One named column and its values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column header
    pub name: String,
    /// Values in row order; always the same length across columns
    pub cells: Vec<Cell>,
}

impl Column {
    /// True when the column holds at least one number and no text.
    /// Nulls are ignored, matching how the summary skips them.
    pub fn is_numeric(&self) -> bool {
        let mut saw_number = false;
        for cell in &self.cells {
            match cell {
                Cell::Number(_) => saw_number = true,
                Cell::Text(_) => return false,
                Cell::Null => {}
            }
        }
        saw_number
    }
}

/// Upload format selector for [`Table::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableFormat {
    /// Comma-separated values (primary and dictionary uploads)
    Csv,
    /// Excel spreadsheet (dictionary uploads only)
    Xlsx,
}

/// In-memory tabular dataset loaded from an upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Parse an uploaded byte stream in the given format
    pub fn load(bytes: &[u8], format: TableFormat) -> Result<Table> {
        match format {
            TableFormat::Csv => Table::from_csv(bytes),
            TableFormat::Xlsx => Table::from_xlsx(bytes),
        }
    }

    /// Parse CSV bytes; the first record is the header row
    pub fn from_csv(bytes: &[u8]) -> Result<Table> {
        let mut reader = csv::Reader::from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| TablyError::parse(e.to_string()))?
            .clone();
        let mut columns: Vec<Column> = headers
            .iter()
            .map(|h| Column {
                name: h.to_string(),
                cells: Vec::new(),
            })
            .collect();

        for result in reader.records() {
            let record = result.map_err(|e| TablyError::parse(e.to_string()))?;
            for (i, field) in record.iter().enumerate() {
                columns[i].cells.push(Cell::from_csv_field(field));
            }
        }

        if columns.is_empty() {
            return Err(TablyError::parse("CSV file has no columns"));
        }

        Ok(Table { columns })
    }

    /// Parse xlsx bytes; the first row of the first sheet is the header row
    pub fn from_xlsx(bytes: &[u8]) -> Result<Table> {
        let cursor = Cursor::new(bytes.to_vec());
        let mut workbook: Xlsx<_> =
            Xlsx::new(cursor).map_err(|e| TablyError::parse(e.to_string()))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| TablyError::parse("spreadsheet contains no sheets"))?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| TablyError::parse(e.to_string()))?;

        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| TablyError::parse("spreadsheet sheet is empty"))?;

        let mut columns: Vec<Column> = header
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let name = match cell {
                    Data::Empty => format!("column_{}", i),
                    other => other.to_string(),
                };
                Column {
                    name,
                    cells: Vec::new(),
                }
            })
            .collect();

        for row in rows {
            for (i, column) in columns.iter_mut().enumerate() {
                // Rows shorter than the header are padded with nulls to keep
                // the equal-length invariant
                let cell = row.get(i).map(Cell::from_xlsx_data).unwrap_or(Cell::Null);
                column.cells.push(cell);
            }
        }

        Ok(Table { columns })
    }

    /// Columns in declaration order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of data rows
    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.cells.len()).unwrap_or(0)
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Render the full table as aligned, human-readable text
    pub fn render(&self) -> String {
        self.render_rows(self.n_rows())
    }

    /// Render the first `n` rows as a preview
    pub fn head(&self, n: usize) -> String {
        self.render_rows(n.min(self.n_rows()))
    }

    fn render_rows(&self, n: usize) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|col| {
                col.cells
                    .iter()
                    .take(n)
                    .map(|c| c.to_string().chars().count())
                    .chain(std::iter::once(col.name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:>width$}", col.name, width = w))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        for row in 0..n {
            let line: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, w)| format!("{:>width$}", col.cells[row].to_string(), width = w))
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &[u8] = b"name,age,score\nalice,34,91.5\nbob,29,84\ncarol,,77.25\n";

    // Three columns (field, description, code); the second data row only
    // fills the first cell
    const SAMPLE_XLSX: &[u8] = include_bytes!("../tests/data/dictionary.xlsx");

    #[test]
    fn test_csv_parse_shape() {
        let table = Table::from_csv(SAMPLE_CSV).unwrap();
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.n_rows(), 3);
        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age", "score"]);
    }

    #[test]
    fn test_csv_numeric_inference() {
        let table = Table::from_csv(SAMPLE_CSV).unwrap();
        let cols = table.columns();
        assert!(!cols[0].is_numeric());
        assert!(cols[1].is_numeric());
        assert!(cols[2].is_numeric());
        assert_eq!(cols[1].cells[2], Cell::Null);
        assert_eq!(cols[2].cells[0], Cell::Number(91.5));
    }

    #[test]
    fn test_csv_ragged_rows_fail() {
        let bad = b"a,b\n1,2\n3\n";
        let err = Table::from_csv(bad).unwrap_err();
        assert!(matches!(err, TablyError::Parse(_)));
    }

    #[test]
    fn test_all_null_column_is_not_numeric() {
        let table = Table::from_csv(b"a,b\n,1\n,2\n").unwrap();
        assert!(!table.columns()[0].is_numeric());
        assert!(table.columns()[1].is_numeric());
    }

    #[test]
    fn test_render_contains_headers_and_values() {
        let table = Table::from_csv(SAMPLE_CSV).unwrap();
        let text = table.render();
        assert!(text.contains("name"));
        assert!(text.contains("alice"));
        assert!(text.contains("91.5"));
        // whole numbers render without a trailing .0
        assert!(text.contains("34"));
        assert!(!text.contains("34.0"));
    }

    #[test]
    fn test_head_limits_rows() {
        let table = Table::from_csv(SAMPLE_CSV).unwrap();
        let preview = table.head(1);
        assert!(preview.contains("alice"));
        assert!(!preview.contains("bob"));
    }

    #[test]
    fn test_xlsx_parse_shape() {
        let table = Table::from_xlsx(SAMPLE_XLSX).unwrap();
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.n_rows(), 2);
        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["field", "description", "code"]);

        let cols = table.columns();
        assert_eq!(cols[0].cells[0], Cell::Text("age".to_string()));
        assert_eq!(cols[1].cells[0], Cell::Text("years since birth".to_string()));
        assert_eq!(cols[2].cells[0], Cell::Number(1.0));
    }

    #[test]
    fn test_xlsx_short_rows_pad_with_nulls() {
        let table = Table::from_xlsx(SAMPLE_XLSX).unwrap();
        let cols = table.columns();
        // The second data row only has a value in the first column; every
        // column still ends up the same length
        assert_eq!(cols[0].cells[1], Cell::Text("score".to_string()));
        assert_eq!(cols[1].cells[1], Cell::Null);
        assert_eq!(cols[2].cells[1], Cell::Null);
        assert!(cols.iter().all(|c| c.cells.len() == table.n_rows()));
    }

    #[test]
    fn test_xlsx_rejects_garbage() {
        let err = Table::from_xlsx(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, TablyError::Parse(_)));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-3.0), "-3");
    }
}
