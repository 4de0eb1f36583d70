// Report sink: plain-text metric reports and CSV snapshot exports

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::market_data::InstrumentSnapshot;

pub const REPORT_TITLE: &str = "Liquidity Report";
pub const DEFAULT_REPORT_PATH: &str = "liquidity_report.txt";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Title line, then one `name: value` line per metric, in the given order.
pub fn render_report(metrics: &[(String, f64)]) -> String {
    let mut out = String::from(REPORT_TITLE);
    out.push('\n');
    for (name, value) in metrics {
        out.push_str(&format!("{name}: {value}\n"));
    }
    out
}

pub fn write_report(path: impl AsRef<Path>, metrics: &[(String, f64)]) -> Result<PathBuf, ReportError> {
    let path = path.as_ref().to_path_buf();
    fs::write(&path, render_report(metrics)).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), metrics = metrics.len(), "report written");
    Ok(path)
}

/// One header row, then one row per snapshot in the order given.
pub fn write_snapshots_csv(
    path: impl AsRef<Path>,
    snapshots: &[InstrumentSnapshot],
) -> Result<PathBuf, ReportError> {
    let path = path.as_ref().to_path_buf();
    let mut wtr = csv::Writer::from_path(&path)?;
    for snapshot in snapshots {
        wtr.serialize(snapshot)?;
    }
    wtr.flush().map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), rows = snapshots.len(), "snapshots exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::QuoteFields;

    #[test]
    fn report_layout() {
        let text = render_report(&[
            ("Bid-Ask Spread".to_string(), 2.0),
            ("Amihud Illiquidity".to_string(), 0.5),
        ]);
        assert_eq!(text, "Liquidity Report\nBid-Ask Spread: 2\nAmihud Illiquidity: 0.5\n");
    }

    #[test]
    fn empty_report_is_title_only() {
        assert_eq!(render_report(&[]), "Liquidity Report\n");
    }

    #[test]
    fn writes_report_and_returns_path() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.txt");

        let written = write_report(&target, &[("Order Book Imbalance".to_string(), f64::NAN)]).unwrap();

        assert_eq!(written, target);
        let text = fs::read_to_string(&written).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["Liquidity Report", "Order Book Imbalance: NaN"]);
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_report(dir.path().join("missing/dir/report.txt"), &[]).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }

    #[test]
    fn snapshot_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let snaps = vec![
            QuoteFields { bid: Some(10.0), ask: Some(12.0), volume: Some(5.0), ..Default::default() }
                .into_snapshot("AAPL", 10, "2024-01-02 09:30:00".into())
                .identify("Apple Inc. (AAPL)", "AAPL"),
            InstrumentSnapshot::placeholder("TCS", "KYC Pending"),
        ];

        let path = write_snapshots_csv(dir.path().join("snaps.csv"), &snaps).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(&headers[0], "bid");
        assert!(headers.iter().any(|h| h == "quality"));

        let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        let quality = headers.iter().position(|h| h == "quality").unwrap();
        assert_eq!(&rows[0][quality], "Full");
        assert_eq!(&rows[1][quality], "Missing");
        assert_eq!(&rows[1][0], "");
    }
}
