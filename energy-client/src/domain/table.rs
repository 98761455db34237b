use time::OffsetDateTime;

use crate::{domain::SeriesKey, domain::TimeSeries, TableError};

#[derive(Debug, Clone, PartialEq)]
struct Column {
    key: SeriesKey,
    values: Vec<f64>,
}

/// Dense table of numeric columns keyed by (measurement, station) over a shared
/// timestamp index. Every column holds exactly one value (possibly NaN) per row.
///
/// Tables are immutable once built; transforms return new tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesTable {
    index: Vec<OffsetDateTime>,
    columns: Vec<Column>,
}

impl TimeSeriesTable {
    /// Empty table over `index`, columns added with [`TimeSeriesTable::with_column`].
    pub fn new(index: Vec<OffsetDateTime>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Builds a table from row-major data. Rows are sorted by timestamp (stable,
    /// so duplicate timestamps keep file order). Short rows are padded with NaN.
    pub fn from_rows(
        keys: Vec<SeriesKey>,
        mut rows: Vec<(OffsetDateTime, Vec<f64>)>,
    ) -> Result<Self, TableError> {
        rows.sort_by_key(|(ts, _)| *ts);

        let mut columns: Vec<Column> = Vec::with_capacity(keys.len());
        for key in keys {
            if columns.iter().any(|c| c.key == key) {
                return Err(TableError::DuplicateKey(key));
            }
            columns.push(Column {
                key,
                values: Vec::with_capacity(rows.len()),
            });
        }

        let mut index = Vec::with_capacity(rows.len());
        for (ts, values) in rows {
            index.push(ts);
            for (i, column) in columns.iter_mut().enumerate() {
                column.values.push(values.get(i).copied().unwrap_or(f64::NAN));
            }
        }

        Ok(Self { index, columns })
    }

    /// Returns a copy of this table with one more column.
    pub fn with_column(mut self, key: SeriesKey, values: Vec<f64>) -> Result<Self, TableError> {
        if values.len() != self.index.len() {
            return Err(TableError::LengthMismatch {
                key,
                expected: self.index.len(),
                actual: values.len(),
            });
        }
        if self.columns.iter().any(|c| c.key == key) {
            return Err(TableError::DuplicateKey(key));
        }
        self.columns.push(Column { key, values });
        Ok(self)
    }

    pub fn index(&self) -> &[OffsetDateTime] {
        &self.index
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Column keys in schema order.
    pub fn keys(&self) -> impl Iterator<Item = &SeriesKey> + '_ {
        self.columns.iter().map(|c| &c.key)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn contains(&self, key: &SeriesKey) -> bool {
        self.columns.iter().any(|c| &c.key == key)
    }

    pub fn column(&self, key: &SeriesKey) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| &c.key == key)
            .map(|c| c.values.as_slice())
    }

    pub fn series(&self, key: &SeriesKey) -> Option<TimeSeries> {
        self.column(key)
            .map(|values| TimeSeries::new(self.index.clone(), values.to_vec()))
    }

    /// Every column as a series, in schema order.
    pub fn iter_series(&self) -> impl Iterator<Item = (&SeriesKey, TimeSeries)> + '_ {
        self.columns
            .iter()
            .map(|c| (&c.key, TimeSeries::new(self.index.clone(), c.values.clone())))
    }

    /// Applies `f` to every cell.
    pub fn map_values<F>(&self, f: F) -> TimeSeriesTable
    where
        F: Fn(f64) -> f64,
    {
        Self {
            index: self.index.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    key: c.key.clone(),
                    values: c.values.iter().map(|&v| f(v)).collect(),
                })
                .collect(),
        }
    }
}
