//! Serialisable view payloads handed to the chart renderer.

use energy_client::domain::{Point, TimeSeries};
use serde::Serialize;
use time::OffsetDateTime;

use crate::transform::{Cycle, EnergyUnit, Period, Segment};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    pub name: String,
    pub points: Vec<Point>,
}

impl NamedSeries {
    /// Named copy of `series` restricted to the inclusive `[from, to]` window.
    pub fn windowed(
        name: impl Into<String>,
        series: &TimeSeries,
        from: Option<OffsetDateTime>,
        to: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            name: name.into(),
            points: series.slice(from, to).points(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Threshold {
    pub name: String,
    pub value: f64,
}

/// A ratio series split into pieces around `limit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentedSeries {
    pub name: String,
    pub limit: f64,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub period: Period,
    pub unit: EnergyUnit,
    pub stations: Vec<String>,
    pub series: Vec<NamedSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationView {
    pub station: String,
    pub period: Option<Period>,
    /// `EA`, `ER+`, `ER-`
    pub series: Vec<NamedSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactiveView {
    pub station: String,
    pub period: Option<Period>,
    /// `EA`, `ER+`, `ER-`
    pub series: Vec<NamedSeries>,
    /// `ER+ %age`, `ER- %age`
    pub ratios: Vec<SegmentedSeries>,
    pub thresholds: Vec<Threshold>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffsetPoint {
    pub offset_days: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternColumn {
    pub label: String,
    /// 1.0 for the most recent cycle, fading to 0.08 for the oldest.
    pub opacity: f64,
    pub points: Vec<OffsetPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternView {
    pub station: String,
    pub cycle: Cycle,
    pub columns: Vec<PatternColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub station: String,
    pub history: NamedSeries,
    pub yhat: NamedSeries,
    pub yhat_lower: NamedSeries,
    pub yhat_upper: NamedSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum View {
    Overview(OverviewView),
    Station(StationView),
    Reactive(ReactiveView),
    Pattern(PatternView),
    Forecast(ForecastView),
    /// Shown when the backing data could not be loaded.
    Placeholder { message: String },
}

impl View {
    pub fn placeholder(message: impl Into<String>) -> Self {
        Self::Placeholder {
            message: message.into(),
        }
    }
}
