use energy_client::{
    domain::{is_all_stations, SeriesKey, TimeSeries, TimeSeriesTable, EA_MINUS, EA_PLUS, ER_MINUS, ER_PLUS},
    queries::{station_column, stations},
};

use crate::error::DashboardError;

/// Per-station derived view: net active energy plus the reactive columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedStation {
    pub station: String,
    /// `EA+ - EA-`
    pub ea: TimeSeries,
    pub er_plus: TimeSeries,
    pub er_minus: TimeSeries,
}

/// Reactive-to-active ratios, `ER+/EA` and `ER-/EA`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactiveRatios {
    pub er_plus_pct: TimeSeries,
    pub er_minus_pct: TimeSeries,
}

pub fn derive(table: &TimeSeriesTable, station: &str) -> Result<DerivedStation, DashboardError> {
    let ea = if is_all_stations(station) {
        total_net_active(table)?
    } else {
        let ea_plus = station_column(table, EA_PLUS, station)?;
        let ea_minus = station_column(table, EA_MINUS, station)?;
        net_active(&ea_plus, &ea_minus)
    };
    let er_plus = station_column(table, ER_PLUS, station)?;
    let er_minus = station_column(table, ER_MINUS, station)?;

    Ok(DerivedStation {
        station: station.to_string(),
        ea,
        er_plus,
        er_minus,
    })
}

/// Sum of every station's own `EA+ - EA-`.
///
/// A station whose net value is NaN in a row contributes nothing to that row;
/// a row where every station is NaN stays NaN.
fn total_net_active(table: &TimeSeriesTable) -> Result<TimeSeries, DashboardError> {
    let per_station: Vec<TimeSeries> = stations(table)
        .iter()
        .filter_map(|s| {
            let plus = table.series(&SeriesKey::new(EA_PLUS, s.as_str()))?;
            let minus = table.series(&SeriesKey::new(EA_MINUS, s.as_str()))?;
            Some(net_active(&plus, &minus))
        })
        .collect();

    if per_station.is_empty() {
        return Err(DashboardError::KeyNotFound(format!("{EA_PLUS}/{EA_MINUS} for any station")));
    }

    let values = (0..table.len())
        .map(|row| {
            per_station
                .iter()
                .map(|ea| ea.values()[row])
                .filter(|v| !v.is_nan())
                .fold(None, |acc: Option<f64>, v| Some(acc.unwrap_or(0.0) + v))
                .unwrap_or(f64::NAN)
        })
        .collect();

    Ok(TimeSeries::new(table.index().to_vec(), values))
}

/// `EA+ - EA-`, NaN in either input gives NaN.
pub fn net_active(ea_plus: &TimeSeries, ea_minus: &TimeSeries) -> TimeSeries {
    ea_plus.zip_with(ea_minus, |p, m| p - m)
}

impl DerivedStation {
    /// Division follows IEEE 754: `x/0` is ±inf, `0/0` and NaN inputs are NaN.
    pub fn ratios(&self) -> ReactiveRatios {
        ReactiveRatios {
            er_plus_pct: self.er_plus.zip_with(&self.ea, |er, ea| er / ea),
            er_minus_pct: self.er_minus.zip_with(&self.ea, |er, ea| er / ea),
        }
    }
}
