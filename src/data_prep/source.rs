//! Tabular Source Readers
//!
//! Reads a CSV file or a named workbook sheet into a [`RawTable`]: a header
//! row plus untyped cells. Type coercion and row filtering happen later in
//! [`super::load_observations`].
//!
//! Supported formats are picked from the file extension:
//! - `.csv`, `.txt` via the `csv` crate (sheet name ignored)
//! - `.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods` via `calamine`

use crate::config::defaults::MISSING_TOKENS;
use crate::error::DataSourceError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// An untyped cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Interpret a textual field the way a spreadsheet reader would.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if MISSING_TOKENS.contains(&trimmed) {
            return Self::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_nan() => Self::Missing,
            Ok(v) => Self::Number(v),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty | Data::Error(_) => Self::Missing,
            Data::Float(f) if f.is_nan() => Self::Missing,
            Data::Float(f) => Self::Number(*f),
            #[allow(clippy::cast_precision_loss)]
            Data::Int(i) => Self::Number(*i as f64),
            Data::String(s) => Self::parse(s),
            other => Self::Text(other.to_string()),
        }
    }
}

/// Header names plus rows of untyped cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let headers = headers.into_iter().map(|h| h.trim().to_string()).collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (row, column); short rows read as missing past their end.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&Cell::Missing)
    }
}

/// Detected source format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }
}

/// A tabular data source on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    pub path: PathBuf,
    pub sheet: String,
}

impl DataSource {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
        }
    }

    /// Read the whole table into memory.
    pub fn read(&self) -> Result<RawTable, DataSourceError> {
        match SourceFormat::from_path(&self.path) {
            Some(SourceFormat::Csv) => read_csv(&self.path),
            Some(SourceFormat::Workbook) => read_workbook(&self.path, &self.sheet),
            None => Err(DataSourceError::UnsupportedFormat(self.path.clone())),
        }
    }
}

/// Read a CSV file with a header row.
pub fn read_csv(path: &Path) -> Result<RawTable, DataSourceError> {
    let file = std::fs::File::open(path).map_err(|source| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_csv_from(file).map_err(|source| DataSourceError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), rows = table.row_count(), "Read CSV source");
    Ok(table)
}

/// Read CSV text from any reader; the first record is the header.
pub fn read_csv_from<R: std::io::Read>(reader: R) -> Result<RawTable, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::parse).collect());
    }
    Ok(RawTable::new(headers, rows))
}

/// Read one sheet of a workbook; the first row is the header.
pub fn read_workbook(path: &Path, sheet: &str) -> Result<RawTable, DataSourceError> {
    let workbook_err = |message: String| DataSourceError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_err(e.to_string()))?;
    let available = workbook.sheet_names();
    if !available.iter().any(|s| s == sheet) {
        return Err(DataSourceError::SheetNotFound {
            sheet: sheet.to_string(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| workbook_err(e.to_string()))?;

    let mut rows_iter = range.rows();
    let header_row = rows_iter.next().ok_or(DataSourceError::MissingHeader)?;
    let headers: Vec<String> = header_row.iter().map(ToString::to_string).collect();
    let rows: Vec<Vec<Cell>> = rows_iter
        .map(|row| row.iter().map(Cell::from).collect())
        .collect();

    debug!(path = %path.display(), sheet, rows = rows.len(), "Read workbook sheet");
    Ok(RawTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parse_missing_tokens() {
        for raw in ["", "  ", "NA", "N/A", "NaN", "nan", "null", "#N/A"] {
            assert_eq!(Cell::parse(raw), Cell::Missing, "token {raw:?}");
        }
    }

    #[test]
    fn test_cell_parse_full_pandas_na_set() {
        for raw in [
            "None", "n/a", "<NA>", "#NA", "#N/A N/A", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
            "-NaN", "-nan", "NULL",
        ] {
            assert_eq!(Cell::parse(raw), Cell::Missing, "token {raw:?}");
        }
        // Case matters, as in pandas
        assert_eq!(Cell::parse("none"), Cell::Text("none".into()));
    }

    #[test]
    fn test_cell_parse_number_and_text() {
        assert_eq!(Cell::parse(" 71.5 "), Cell::Number(71.5));
        assert_eq!(Cell::parse("Jawa Barat"), Cell::Text("Jawa Barat".into()));
    }

    #[test]
    fn test_read_csv_from_short_rows_read_missing() {
        let text = "a,b,c\n1,2,3\n4,5\n";
        let table = read_csv_from(text.as_bytes()).unwrap();
        assert_eq!(table.headers(), &["a", "b", "c"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 1), &Cell::Number(5.0));
        assert!(table.cell(1, 2).is_missing());
    }

    #[test]
    fn test_headers_trimmed() {
        let table = read_csv_from(" AHH , Tahun\n1,2\n".as_bytes()).unwrap();
        assert_eq!(table.column_index("AHH"), Some(0));
        assert_eq!(table.column_index("Tahun"), Some(1));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("d.CSV")), Some(SourceFormat::Csv));
        assert_eq!(
            SourceFormat::from_path(Path::new("DATASET 211024.xlsx")),
            Some(SourceFormat::Workbook)
        );
        assert_eq!(SourceFormat::from_path(Path::new("d.parquet")), None);
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let err = DataSource::new("data.parquet", "BENER").read().unwrap_err();
        assert!(matches!(err, DataSourceError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_csv_is_io_error() {
        let err = DataSource::new("/nonexistent/dir/data.csv", "BENER")
            .read()
            .unwrap_err();
        assert!(matches!(err, DataSourceError::Io { .. }));
    }
}
