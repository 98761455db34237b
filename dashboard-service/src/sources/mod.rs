use std::path::Path;

use crate::error::DashboardError;

pub mod forecast_csv_file;
pub mod parse;
pub mod telemetry_csv_file;

pub use forecast_csv_file::ForecastCsvFileSource;
pub use telemetry_csv_file::TelemetryCsvFileSource;

/// A file-backed table loader.
pub trait Source<T>: Send + Sync {
    fn path(&self) -> &Path;

    fn load(&self) -> Result<T, DashboardError>;
}
