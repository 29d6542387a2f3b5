//! Column-addressable string tables produced by the delimited-text reader.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Errors raised while building a [`ParsedTable`]
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error reading the input
    #[error("Failed to read table: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV/TSV parsing error
    #[error("Delimited text parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Columns of different lengths were supplied
    #[error("Column '{column}' has {found} rows, expected {expected}")]
    RaggedColumn {
        /// Offending column key
        column: String,
        /// Row count of the first column
        expected: usize,
        /// Row count of this column
        found: usize,
    },

    /// A data row has a different number of cells than the header
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based data row index
        row: usize,
        /// Number of columns
        expected: usize,
        /// Number of cells found
        found: usize,
    },

    /// Two columns share a key
    #[error("Duplicate column key: '{0}'")]
    DuplicateColumn(String),
}

/// Immutable table of string cells, addressed by column key.
///
/// A key is either a header name or the zero-based column index written as a
/// decimal string; header names take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    keys: Vec<String>,
    columns: Vec<Vec<String>>,
    row_count: usize,
}

impl ParsedTable {
    /// Build a table from `(key, cells)` pairs; all columns must have equal length
    pub fn from_columns<K, I>(columns: I) -> Result<Self, TableError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Vec<String>)>,
    {
        let mut table = ParsedTable::default();
        for (index, (key, cells)) in columns.into_iter().enumerate() {
            let key = key.into();
            if index == 0 {
                table.row_count = cells.len();
            } else if cells.len() != table.row_count {
                return Err(TableError::RaggedColumn {
                    column: key,
                    expected: table.row_count,
                    found: cells.len(),
                });
            }
            if table.keys.contains(&key) {
                return Err(TableError::DuplicateColumn(key));
            }
            table.keys.push(key);
            table.columns.push(cells);
        }
        Ok(table)
    }

    /// Convenience constructor from string slices
    pub fn from_str_columns(columns: &[(&str, &[&str])]) -> Result<Self, TableError> {
        Self::from_columns(columns.iter().map(|(key, cells)| {
            (
                key.to_string(),
                cells.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            )
        }))
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column keys in input order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Cells of a column by header name or index string
    pub fn column(&self, key: &str) -> Option<&[String]> {
        if let Some(position) = self.keys.iter().position(|k| k == key) {
            return Some(&self.columns[position]);
        }
        key.trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| self.columns.get(index))
            .map(|cells| cells.as_slice())
    }
}

/// Options for [`read_delimited`]
#[derive(Debug, Clone)]
pub struct TableReadOptions {
    /// Field delimiter byte
    pub delimiter: u8,
    /// Number of leading lines to skip; the last skipped line supplies the
    /// column names when greater than zero
    pub header_lines: usize,
    /// Trim surrounding whitespace from every cell
    pub trim: bool,
}

impl Default for TableReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            header_lines: 1,
            trim: true,
        }
    }
}

/// Read a delimited text file into a [`ParsedTable`]
pub fn read_delimited_file<P: AsRef<Path>>(
    path: P,
    options: &TableReadOptions,
) -> Result<ParsedTable, TableError> {
    let file = File::open(path)?;
    read_delimited(BufReader::new(file), options)
}

/// Read delimited text into a [`ParsedTable`].
///
/// Columns are keyed by the header names from the last header line (when
/// there is one), and are always also reachable by index.
pub fn read_delimited<R: Read>(reader: R, options: &TableReadOptions) -> Result<ParsedTable, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(if options.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .from_reader(reader);

    let mut header: Option<Vec<String>> = None;
    let mut columns: Vec<Vec<String>> = Vec::new();
    let mut width: Option<usize> = None;

    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        if line < options.header_lines {
            if line + 1 == options.header_lines {
                header = Some(record.iter().map(|s| s.to_string()).collect());
            }
            continue;
        }
        // Blank lines come through as a single empty field
        if record.len() == 1 && record.get(0).map_or(true, str::is_empty) {
            continue;
        }

        let row = line - options.header_lines;
        let expected = *width.get_or_insert_with(|| {
            header.as_ref().map_or(record.len(), |h| h.len())
        });
        if record.len() != expected {
            return Err(TableError::RaggedRow {
                row,
                expected,
                found: record.len(),
            });
        }
        if columns.is_empty() {
            columns = vec![Vec::new(); expected];
        }
        for (column, cell) in columns.iter_mut().zip(record.iter()) {
            column.push(cell.to_string());
        }
    }

    let width = width.unwrap_or_else(|| header.as_ref().map_or(0, |h| h.len()));
    if columns.is_empty() {
        columns = vec![Vec::new(); width];
    }
    let keys: Vec<String> = match header {
        Some(names) => names
            .into_iter()
            .enumerate()
            .map(|(i, name)| if name.is_empty() { i.to_string() } else { name })
            .collect(),
        None => (0..width).map(|i| i.to_string()).collect(),
    };

    ParsedTable::from_columns(keys.into_iter().zip(columns))
}
