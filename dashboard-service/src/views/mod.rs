//! One parameterised view builder over the transforms.

use std::{fmt, str::FromStr};

use energy_client::{
    domain::{is_all_stations, ForecastTable, TimeSeriesTable, ALL_STATIONS},
    queries::stations,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{config::LimitsConfig, error::DashboardError};

pub mod energy;
pub mod forecast;
pub mod model;
pub mod pattern;

pub use model::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Overview,
    Station,
    Reactive,
    Pattern,
    Forecast,
}

impl ViewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Station => "station",
            Self::Reactive => "reactive",
            Self::Pattern => "pattern",
            Self::Forecast => "forecast",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overview" => Ok(Self::Overview),
            "station" => Ok(Self::Station),
            "reactive" => Ok(Self::Reactive),
            "pattern" => Ok(Self::Pattern),
            "forecast" => Ok(Self::Forecast),
            other => Err(DashboardError::InvalidArgument(format!("unknown view '{other}'"))),
        }
    }
}

/// Widget state as received from the UI. Every field is optional; builders
/// fall back to the dashboard defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewRequest {
    pub station: Option<String>,
    pub period: Option<String>,
    pub unit: Option<String>,
    pub cycle: Option<String>,
    pub order: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub from: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub to: Option<OffsetDateTime>,
}

/// Loaded inputs a view is built from.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub table: &'a TimeSeriesTable,
    pub forecast: Option<&'a ForecastTable>,
    pub limits: LimitsConfig,
    pub history_start: Option<OffsetDateTime>,
}

pub fn build_view(
    kind: ViewKind,
    request: &ViewRequest,
    ctx: &ViewContext<'_>,
) -> Result<View, DashboardError> {
    if ctx.table.is_empty() {
        return Ok(View::placeholder("no telemetry data loaded"));
    }

    let view = match kind {
        ViewKind::Overview => View::Overview(energy::overview(ctx.table, request)?),
        ViewKind::Station => View::Station(energy::station(ctx.table, request)?),
        ViewKind::Reactive => View::Reactive(energy::reactive(ctx.table, request, ctx.limits)?),
        ViewKind::Pattern => View::Pattern(pattern::pattern(ctx.table, request)?),
        ViewKind::Forecast => match ctx.forecast {
            Some(fc) if !fc.is_empty() => {
                View::Forecast(forecast::forecast(ctx.table, fc, request, ctx.history_start)?)
            }
            _ => View::placeholder("no forecast data loaded"),
        },
    };
    Ok(view)
}

/// Resolve the requested station: `All`/`Total`, a physical station, or the
/// first station in the table when none was requested.
pub(crate) fn resolve_station(
    table: &TimeSeriesTable,
    requested: Option<&str>,
) -> Result<String, DashboardError> {
    let known = stations(table);
    match requested.map(str::trim) {
        Some(s) if is_all_stations(s) => Ok(ALL_STATIONS.to_string()),
        Some(s) if known.iter().any(|k| k == s) => Ok(s.to_string()),
        Some(s) => Err(DashboardError::KeyNotFound(format!("station '{s}'"))),
        None => known
            .into_iter()
            .next()
            .ok_or_else(|| DashboardError::KeyNotFound("any station".to_string())),
    }
}
