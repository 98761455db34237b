use std::path::{Path, PathBuf};

use energy_client::domain::{SeriesKey, TimeSeriesTable};

use crate::{
    error::DashboardError,
    sources::{parse, Source},
    transform::normalize_key,
};

/// CSV telemetry table with a two-level column header.
///
/// Layout:
/// - header row 1: index label, then `<measurement>[<unit>]` per column
/// - header row 2: index label, then station name per column
/// - data rows: timestamp, then one value per column (empty = missing)
///
/// Unit suffixes are stripped from measurement labels on load.
pub struct TelemetryCsvFileSource {
    path: PathBuf,
}

impl TelemetryCsvFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl Source<TimeSeriesTable> for TelemetryCsvFileSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<TimeSeriesTable, DashboardError> {
        let mut rdr = parse::open_reader(&self.path)?;
        let (measurements, stations) = parse::read_header_pair(&mut rdr)?;

        let keys: Vec<SeriesKey> = measurements
            .iter()
            .zip(stations.iter())
            .skip(1)
            .map(|(m, s)| normalize_key(m, s))
            .collect();

        let rows = parse::read_rows(&mut rdr, keys.len())?;
        let table = TimeSeriesTable::from_rows(keys, rows)?;

        tracing::info!(
            path = %self.path.display(),
            rows = table.len(),
            columns = table.column_count(),
            "telemetry table loaded"
        );
        Ok(table)
    }
}
