use std::fmt;

use time::OffsetDateTime;

use crate::{
    domain::{SeriesKey, TimeSeries, TimeSeriesTable},
    TableError,
};

/// Columns produced per station by the external forecasting process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastField {
    /// Historical value, present only for the fitted range.
    Y,
    Yhat,
    YhatLower,
    YhatUpper,
}

impl ForecastField {
    pub const ALL: [ForecastField; 4] = [Self::Y, Self::Yhat, Self::YhatLower, Self::YhatUpper];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Y => "y",
            Self::Yhat => "yhat",
            Self::YhatLower => "yhat_lower",
            Self::YhatUpper => "yhat_upper",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s.trim())
    }
}

impl fmt::Display for ForecastField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only forecast frame keyed by (station or `All`, field).
///
/// Stored as a [`TimeSeriesTable`] whose key measurement is the field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastTable {
    table: TimeSeriesTable,
}

impl ForecastTable {
    pub fn from_rows(
        keys: Vec<(String, ForecastField)>,
        rows: Vec<(OffsetDateTime, Vec<f64>)>,
    ) -> Result<Self, TableError> {
        let keys = keys
            .into_iter()
            .map(|(station, field)| SeriesKey::new(field.as_str(), station))
            .collect();
        Ok(Self {
            table: TimeSeriesTable::from_rows(keys, rows)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// First forecast timestamp.
    pub fn start(&self) -> Option<OffsetDateTime> {
        self.table.index().first().copied()
    }

    pub fn stations(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for key in self.table.keys() {
            if !out.contains(&key.station) {
                out.push(key.station.clone());
            }
        }
        out
    }

    pub fn series(&self, station: &str, field: ForecastField) -> Result<TimeSeries, TableError> {
        let key = SeriesKey::new(field.as_str(), station);
        self.table
            .series(&key)
            .ok_or_else(|| TableError::KeyNotFound(format!("({station}, {field})")))
    }
}
