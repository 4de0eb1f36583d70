// Column-oriented numeric table loaded from CSV
//
// Every cell is an Option<f64>: blanks, "NaN" and non-numeric text all read
// as absent. Columns holding any non-numeric text (dates, tickers) also keep
// their raw cells, readable through `text_column`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use itertools::Itertools;
use thiserror::Error;
use tracing::debug;

pub const RETURNS: &str = "returns";
pub const CLOSE: &str = "close";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("column `{column}` has {found} rows, expected {expected}")]
    Ragged { column: String, expected: usize, found: usize },
}

pub type Column = Vec<Option<f64>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, Column)>,
    text: Vec<(String, Vec<String>)>,
    rows: usize,
}

impl Table {
    /// Build from named columns. Names are lower-cased and trimmed like CSV
    /// headers; a repeated name replaces the earlier column.
    pub fn from_columns<S: AsRef<str>>(columns: Vec<(S, Column)>) -> Result<Self, TableError> {
        let mut table = Table::default();
        for (name, values) in columns {
            table = table.with_column(name.as_ref(), values)?;
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Raw cells of a column that held non-numeric text when loaded.
    pub fn text_column(&self, name: &str) -> Option<&[String]> {
        self.text
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn with_column(mut self, name: &str, values: Column) -> Result<Self, TableError> {
        let name = normalise_header(name);
        if !self.columns.is_empty() && values.len() != self.rows {
            return Err(TableError::Ragged {
                column: name,
                expected: self.rows,
                found: values.len(),
            });
        }
        self.rows = values.len();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
        Ok(self)
    }

    /// Add `returns` as the percentage change of `close` when the table has
    /// a close column but no returns column.
    pub fn ensure_returns(self) -> Self {
        if self.has_column(RETURNS) {
            return self;
        }
        let Some(close) = self.column(CLOSE) else {
            return self;
        };
        let returns = percent_change(close);
        let mut table = self;
        table.columns.push((RETURNS.to_string(), returns));
        table
    }
}

fn normalise_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Row-over-row percentage change. The first row, rows next to a gap, and
/// rows following a zero are undefined.
pub fn percent_change(values: &[Option<f64>]) -> Column {
    std::iter::once(None)
        .chain(values.iter().tuple_windows().map(|(prev, cur)| match (prev, cur) {
            (Some(prev), Some(cur)) if *prev != 0.0 => Some((cur - prev) / prev),
            _ => None,
        }))
        .take(values.len())
        .collect()
}

fn parse_cell(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// Non-empty and not a number at all ("NaN" is a number, just not a usable one)
fn is_text(raw: &str) -> bool {
    let raw = raw.trim();
    !raw.is_empty() && raw.parse::<f64>().is_err()
}

/// Read a CSV table, then derive `returns` from `close` if needed.
pub fn load_table<R: Read>(reader: R) -> Result<Table, TableError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(normalise_header).collect();
    let mut columns: Vec<Column> = vec![Vec::new(); headers.len()];
    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for record in rdr.records() {
        let record = record?;
        for (i, (column, cells)) in columns.iter_mut().zip(raw.iter_mut()).enumerate() {
            let cell = record.get(i).unwrap_or_default();
            column.push(parse_cell(cell));
            cells.push(cell.to_string());
        }
    }

    let text = headers
        .iter()
        .zip(raw)
        .filter(|(_, cells)| cells.iter().any(|c| is_text(c)))
        .map(|(name, cells)| (name.clone(), cells))
        .collect();

    let mut table = Table::from_columns(headers.into_iter().zip(columns).collect())?;
    table.text = text;
    let table = table.ensure_returns();
    debug!(rows = table.len(), columns = ?table.headers().collect::<Vec<_>>(), "table loaded");
    Ok(table)
}

pub fn load_table_path(path: impl AsRef<Path>) -> Result<Table, TableError> {
    load_table(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn headers_are_normalised_and_returns_derived() {
        let csv = " Date ,Close, VOLUME\n2024-01-01,100,10\n2024-01-02,110,20\n2024-01-03,99,0\n";
        let table = load_table(csv.as_bytes()).unwrap();

        assert_eq!(table.headers().collect::<Vec<_>>(), vec!["date", "close", "volume", "returns"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.column("date").unwrap(), &[None, None, None]);
        assert_eq!(
            table.text_column("date").unwrap(),
            &["2024-01-01", "2024-01-02", "2024-01-03"]
        );
        assert!(table.text_column("close").is_none());

        let returns = table.column(RETURNS).unwrap();
        assert_eq!(returns[0], None);
        assert!((returns[1].unwrap() - 0.1).abs() < 1e-12);
        assert!((returns[2].unwrap() + 0.1).abs() < 1e-12);
    }

    #[test]
    fn existing_returns_are_kept() {
        let csv = "close,returns\n100,0.5\n200,0.7\n";
        let table = load_table(csv.as_bytes()).unwrap();
        assert_eq!(table.column(RETURNS).unwrap(), &[Some(0.5), Some(0.7)]);
    }

    #[test]
    fn nan_and_blank_cells_are_absent() {
        let csv = "bid,ask\nNaN,101\n,102\n100,abc\n";
        let table = load_table(csv.as_bytes()).unwrap();
        assert_eq!(table.column("bid").unwrap(), &[None, None, Some(100.0)]);
        assert_eq!(table.column("ask").unwrap(), &[Some(101.0), Some(102.0), None]);
        // NaN and blanks are missing numbers, not text
        assert!(table.text_column("bid").is_none());
        assert_eq!(table.text_column("ask").unwrap(), &["101", "102", "abc"]);
    }

    #[test]
    fn short_rows_pad_with_none() {
        let csv = "bid,ask\n100,101\n200\n";
        let table = load_table(csv.as_bytes()).unwrap();
        assert_eq!(table.column("ask").unwrap(), &[Some(101.0), None]);
    }

    #[test]
    fn zero_previous_close_is_undefined() {
        let change = percent_change(&[Some(0.0), Some(5.0), None, Some(1.0)]);
        assert_eq!(change, vec![None, None, None, None]);
    }

    #[test]
    fn percent_change_of_empty_and_single() {
        assert!(percent_change(&[]).is_empty());
        assert_eq!(percent_change(&[Some(3.0)]), vec![None]);
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = Table::from_columns(vec![
            ("bid", vec![Some(1.0), Some(2.0)]),
            ("ask", vec![Some(1.0)]),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::Ragged { expected: 2, found: 1, .. }));
    }

    #[test]
    fn loads_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Bid,Ask").unwrap();
        writeln!(file, "1.5,1.7").unwrap();
        file.flush().unwrap();

        let table = load_table_path(file.path()).unwrap();
        assert_eq!(table.column("bid").unwrap(), &[Some(1.5)]);
        assert!(!table.has_column(RETURNS));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_table_path(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, TableError::Io(_)));
    }
}
