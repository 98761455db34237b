use std::borrow::Cow;

use energy_client::{
    domain::{TimeSeriesTable, ALL_STATIONS, EA, ER_MINUS, ER_PLUS},
    queries::stations,
};

use crate::{
    config::LimitsConfig,
    error::DashboardError,
    transform::{derive, resample_by, segment, EnergyUnit, Period},
    views::{
        resolve_station, NamedSeries, OverviewView, ReactiveView, SegmentedSeries, StationView,
        Threshold, ViewRequest,
    },
};

/// Every column resampled to the requested period, in the requested unit.
pub fn overview(table: &TimeSeriesTable, req: &ViewRequest) -> Result<OverviewView, DashboardError> {
    let period: Period = req.period.as_deref().unwrap_or("6h").parse()?;
    let unit: EnergyUnit = req.unit.as_deref().unwrap_or("MWh").parse()?;

    let resampled = unit.convert_table(&resample_by(table, period)?);
    let series = resampled
        .iter_series()
        .map(|(key, s)| NamedSeries::windowed(key.to_string(), &s, req.from, req.to))
        .collect();

    let mut stations = stations(table);
    stations.push(ALL_STATIONS.to_string());

    Ok(OverviewView {
        period,
        unit,
        stations,
        series,
    })
}

/// `EA`, `ER+` and `ER-` for one station.
pub fn station(table: &TimeSeriesTable, req: &ViewRequest) -> Result<StationView, DashboardError> {
    let station = resolve_station(table, req.station.as_deref())?;
    let (period, table) = optionally_resampled(table, req)?;
    let derived = derive(&table, &station)?;

    Ok(StationView {
        station,
        period,
        series: vec![
            NamedSeries::windowed(EA, &derived.ea, req.from, req.to),
            NamedSeries::windowed(ER_PLUS, &derived.er_plus, req.from, req.to),
            NamedSeries::windowed(ER_MINUS, &derived.er_minus, req.from, req.to),
        ],
    })
}

/// Derived series plus reactive ratios split around limit x1.
pub fn reactive(
    table: &TimeSeriesTable,
    req: &ViewRequest,
    limits: LimitsConfig,
) -> Result<ReactiveView, DashboardError> {
    let station = resolve_station(table, req.station.as_deref())?;
    let (period, table) = optionally_resampled(table, req)?;
    let derived = derive(&table, &station)?;
    let ratios = derived.ratios();

    // Segment the displayed window only so pieces start at its edge.
    let er_plus_pct = ratios.er_plus_pct.slice(req.from, req.to);
    let er_minus_pct = ratios.er_minus_pct.slice(req.from, req.to);

    Ok(ReactiveView {
        station,
        period,
        series: vec![
            NamedSeries::windowed(EA, &derived.ea, req.from, req.to),
            NamedSeries::windowed(ER_PLUS, &derived.er_plus, req.from, req.to),
            NamedSeries::windowed(ER_MINUS, &derived.er_minus, req.from, req.to),
        ],
        ratios: vec![
            SegmentedSeries {
                name: format!("{ER_PLUS} %age"),
                limit: limits.x1,
                segments: segment(&er_plus_pct, limits.x1),
            },
            SegmentedSeries {
                name: format!("{ER_MINUS} %age"),
                limit: limits.x1,
                segments: segment(&er_minus_pct, limits.x1),
            },
        ],
        thresholds: vec![
            Threshold {
                name: format!("Limit x1 ({})", limits.x1),
                value: limits.x1,
            },
            Threshold {
                name: format!("Limit x3 ({})", limits.x3),
                value: limits.x3,
            },
        ],
    })
}

fn optionally_resampled<'a>(
    table: &'a TimeSeriesTable,
    req: &ViewRequest,
) -> Result<(Option<Period>, Cow<'a, TimeSeriesTable>), DashboardError> {
    match req.period.as_deref() {
        None => Ok((None, Cow::Borrowed(table))),
        Some(p) => {
            let period: Period = p.parse()?;
            Ok((Some(period), Cow::Owned(resample_by(table, period)?)))
        }
    }
}
