use std::path::{Path, PathBuf};

use energy_client::domain::{ForecastField, ForecastTable};

use crate::{
    error::DashboardError,
    sources::{parse, Source},
};

/// CSV forecast table produced by the external forecasting job.
///
/// Header row 1 holds the station (or `All`), header row 2 the field
/// (`y`, `yhat`, `yhat_lower`, `yhat_upper`). Other fields are skipped.
pub struct ForecastCsvFileSource {
    path: PathBuf,
}

impl ForecastCsvFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl Source<ForecastTable> for ForecastCsvFileSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<ForecastTable, DashboardError> {
        let mut rdr = parse::open_reader(&self.path)?;
        let (stations, fields) = parse::read_header_pair(&mut rdr)?;

        let mut keep = Vec::new();
        let mut keys = Vec::new();
        for (i, (station, field)) in stations.iter().zip(fields.iter()).enumerate().skip(1) {
            match ForecastField::parse(field) {
                Some(f) => {
                    keep.push(i - 1);
                    keys.push((station.trim().to_string(), f));
                }
                None => {
                    tracing::warn!(station, field, "ignoring unknown forecast column");
                }
            }
        }

        let width = stations.len().saturating_sub(1);
        let rows = parse::read_rows(&mut rdr, width)?
            .into_iter()
            .map(|(ts, values)| {
                let kept = keep
                    .iter()
                    .map(|&i| values.get(i).copied().unwrap_or(f64::NAN))
                    .collect();
                (ts, kept)
            })
            .collect();

        let table = ForecastTable::from_rows(keys, rows)?;
        tracing::info!(
            path = %self.path.display(),
            stations = table.stations().len(),
            "forecast table loaded"
        );
        Ok(table)
    }
}
