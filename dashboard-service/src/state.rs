use energy_client::domain::{ForecastTable, TimeSeriesTable};
use time::OffsetDateTime;

use crate::{
    cache::FileCache,
    config::{AppConfig, LimitsConfig},
    error::DashboardError,
    sources::{ForecastCsvFileSource, TelemetryCsvFileSource},
    views::{build_view, View, ViewContext, ViewKind, ViewRequest},
};

/// Shared per-process state: sources, their caches and view settings.
pub struct DashboardState {
    limits: LimitsConfig,
    history_start: Option<OffsetDateTime>,
    telemetry: TelemetryCsvFileSource,
    forecast: Option<ForecastCsvFileSource>,
    tables: FileCache<TimeSeriesTable>,
    forecasts: FileCache<ForecastTable>,
}

impl DashboardState {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            limits: cfg.limits,
            history_start: cfg.forecast.history_start,
            telemetry: TelemetryCsvFileSource::new(&cfg.data.table_path),
            forecast: cfg.data.forecast_path.as_ref().map(ForecastCsvFileSource::new),
            tables: FileCache::new(),
            forecasts: FileCache::new(),
        }
    }

    /// Build one view from the cached tables.
    ///
    /// Missing source files degrade to a placeholder view instead of an error.
    pub fn render(&self, kind: ViewKind, request: &ViewRequest) -> Result<View, DashboardError> {
        metrics::counter!("dashboard_view_requests_total", "view" => kind.as_str()).increment(1);

        let table = match self.tables.get(&self.telemetry) {
            Ok(table) => table,
            Err(DashboardError::DataUnavailable { path }) => {
                return Ok(View::placeholder(format!("data file not found: {path}")));
            }
            Err(e) => return Err(e),
        };

        let forecast = match (&self.forecast, kind) {
            (Some(source), ViewKind::Forecast) => match self.forecasts.get(source) {
                Ok(fc) => Some(fc),
                Err(DashboardError::DataUnavailable { path }) => {
                    return Ok(View::placeholder(format!("forecast file not found: {path}")));
                }
                Err(e) => return Err(e),
            },
            _ => None,
        };

        let ctx = ViewContext {
            table: &table,
            forecast: forecast.as_deref(),
            limits: self.limits,
            history_start: self.history_start,
        };

        build_view(kind, request, &ctx).inspect_err(|e| {
            metrics::counter!("dashboard_view_errors_total", "view" => kind.as_str()).increment(1);
            tracing::warn!(view = %kind, error = %e, "view build failed");
        })
    }

    /// Drop every cached table so the next request reloads from disk.
    pub fn invalidate(&self) {
        self.tables.clear();
        self.forecasts.clear();
        tracing::info!("table caches cleared");
    }
}
