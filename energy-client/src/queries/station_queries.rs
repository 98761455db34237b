use crate::{
    domain::{is_all_stations, SeriesKey, TimeSeries, TimeSeriesTable},
    TableError,
};

/// Physical stations present in the table, in schema order.
pub fn stations(table: &TimeSeriesTable) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for key in table.keys() {
        if !is_all_stations(&key.station) && !out.contains(&key.station) {
            out.push(key.station.clone());
        }
    }
    out
}

/// Measurements present in the table, in schema order.
pub fn measurements(table: &TimeSeriesTable) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for key in table.keys() {
        if !out.contains(&key.measurement) {
            out.push(key.measurement.clone());
        }
    }
    out
}

/// Fetch one measurement for one station.
///
/// `All` (or `Total`) sums the measurement over every physical station that
/// records it. NaN cells are skipped; a row where every station is NaN stays NaN.
pub fn station_column(
    table: &TimeSeriesTable,
    measurement: &str,
    station: &str,
) -> Result<TimeSeries, TableError> {
    if !is_all_stations(station) {
        if !table.keys().any(|k| k.station == station) {
            return Err(TableError::StationNotFound(station.to_string()));
        }
        let key = SeriesKey::new(measurement, station);
        return table
            .series(&key)
            .ok_or_else(|| TableError::KeyNotFound(key.to_string()));
    }

    let parts: Vec<&[f64]> = stations(table)
        .iter()
        .filter_map(|s| table.column(&SeriesKey::new(measurement, s.as_str())))
        .collect();

    if parts.is_empty() {
        return Err(TableError::KeyNotFound(
            SeriesKey::new(measurement, station).to_string(),
        ));
    }

    let values = (0..table.len())
        .map(|row| {
            parts
                .iter()
                .map(|col| col[row])
                .filter(|v| !v.is_nan())
                .fold(None, |acc: Option<f64>, v| Some(acc.unwrap_or(0.0) + v))
                .unwrap_or(f64::NAN)
        })
        .collect();

    Ok(TimeSeries::new(table.index().to_vec(), values))
}
