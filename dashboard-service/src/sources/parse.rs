use std::{fs::File, path::Path};

use csv::StringRecord;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, Time,
};

use crate::error::DashboardError;

/// Parse an index cell. Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[+HH:MM]`
/// and bare dates; values without an offset are taken as UTC.
pub fn parse_timestamp(s: &str) -> Result<OffsetDateTime, DashboardError> {
    let s = s.trim();
    if let Ok(ts) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(ts);
    }
    if let Ok(ts) = OffsetDateTime::parse(
        s,
        format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        ),
    ) {
        return Ok(ts);
    }
    if let Ok(ts) = PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day] [hour]:[minute]:[second]")) {
        return Ok(ts.assume_utc());
    }
    if let Ok(ts) = PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]")) {
        return Ok(ts.assume_utc());
    }
    if let Ok(date) = Date::parse(s, format_description!("[year]-[month]-[day]")) {
        return Ok(PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc());
    }
    Err(DashboardError::Parse(format!("invalid timestamp '{s}'")))
}

/// Parse a value cell. Empty cells and `NaN` are missing samples.
pub fn parse_value(s: &str) -> Result<f64, DashboardError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse()
        .map_err(|e| DashboardError::Parse(format!("invalid value '{s}': {e}")))
}

pub fn open_reader(path: &Path) -> Result<csv::Reader<File>, DashboardError> {
    let file = File::open(path).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "source file unavailable");
        DashboardError::DataUnavailable {
            path: path.display().to_string(),
        }
    })?;
    Ok(csv::ReaderBuilder::new().has_headers(false).from_reader(file))
}

/// Read the two header rows of a two-level column layout.
pub fn read_header_pair(
    rdr: &mut csv::Reader<File>,
) -> Result<(StringRecord, StringRecord), DashboardError> {
    let mut records = rdr.records();
    let mut next = |which: &str| -> Result<StringRecord, DashboardError> {
        records
            .next()
            .ok_or_else(|| DashboardError::Parse(format!("missing {which} header row")))?
            .map_err(|e| DashboardError::Parse(format!("failed to read {which} header row: {e}")))
    };
    let first = next("first")?;
    let second = next("second")?;
    Ok((first, second))
}

/// Read the remaining data rows: a timestamp cell followed by `width` values.
///
/// A row whose index cell is not a timestamp and whose value cells are all
/// empty (the index-name row some writers emit) is skipped.
pub fn read_rows(
    rdr: &mut csv::Reader<File>,
    width: usize,
) -> Result<Vec<(OffsetDateTime, Vec<f64>)>, DashboardError> {
    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| DashboardError::Parse(format!("failed to read record: {e}")))?;
        let ts_cell = record.get(0).unwrap_or("");

        let ts = match parse_timestamp(ts_cell) {
            Ok(ts) => ts,
            Err(_) if record.iter().skip(1).all(|c| c.trim().is_empty()) => {
                tracing::debug!(line, cell = ts_cell, "skipping non-data row");
                continue;
            }
            Err(e) => {
                metrics::counter!("dashboard_parse_errors_total").increment(1);
                return Err(e);
            }
        };

        let mut values = Vec::with_capacity(width);
        for cell in record.iter().skip(1).take(width) {
            values.push(parse_value(cell)?);
        }
        rows.push((ts, values));
    }
    Ok(rows)
}
