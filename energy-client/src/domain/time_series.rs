use serde::Serialize;
use time::OffsetDateTime;

/// One sample of a series. A NaN `value` is a missing sample and serialises as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    #[serde(with = "time::serde::rfc3339")]
    pub ts: OffsetDateTime,
    pub value: f64,
}

impl Point {
    pub fn new(ts: OffsetDateTime, value: f64) -> Self {
        Self { ts, value }
    }
}

/// Timestamp-ordered scalar series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    index: Vec<OffsetDateTime>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Pairs `index` with `values`. Both must have the same length.
    pub fn new(index: Vec<OffsetDateTime>, values: Vec<f64>) -> Self {
        debug_assert_eq!(index.len(), values.len(), "series index/value length mismatch");
        Self { index, values }
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (OffsetDateTime, f64)>,
    {
        let (index, values) = points.into_iter().unzip();
        Self { index, values }
    }

    pub fn index(&self) -> &[OffsetDateTime] {
        &self.index
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn first_ts(&self) -> Option<OffsetDateTime> {
        self.index.first().copied()
    }

    pub fn last_ts(&self) -> Option<OffsetDateTime> {
        self.index.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OffsetDateTime, f64)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }

    pub fn points(&self) -> Vec<Point> {
        self.iter().map(|(ts, value)| Point::new(ts, value)).collect()
    }

    /// Applies `f` to every value, keeping the index.
    pub fn map<F>(&self, f: F) -> TimeSeries
    where
        F: Fn(f64) -> f64,
    {
        Self {
            index: self.index.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Row-wise combination of two series sharing the same index.
    pub fn zip_with<F>(&self, other: &TimeSeries, f: F) -> TimeSeries
    where
        F: Fn(f64, f64) -> f64,
    {
        debug_assert_eq!(self.index, other.index, "zip_with requires a shared index");
        Self {
            index: self.index.clone(),
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    /// Samples with `from <= ts <= to`; a `None` bound is open.
    pub fn slice(&self, from: Option<OffsetDateTime>, to: Option<OffsetDateTime>) -> TimeSeries {
        let start = from.map_or(0, |from| self.index.partition_point(|ts| *ts < from));
        let end = to.map_or(self.index.len(), |to| self.index.partition_point(|ts| *ts <= to));
        if start >= end {
            return Self::default();
        }
        Self {
            index: self.index[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn hourly(values: &[f64]) -> TimeSeries {
        let start = datetime!(2024-11-04 00:00:00 UTC);
        TimeSeries::from_points(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + time::Duration::hours(i as i64), *v)),
        )
    }

    #[test]
    fn slice_bounds_are_inclusive() {
        let s = hourly(&[1.0, 2.0, 3.0, 4.0]);
        let sliced = s.slice(
            Some(datetime!(2024-11-04 01:00:00 UTC)),
            Some(datetime!(2024-11-04 02:00:00 UTC)),
        );
        assert_eq!(sliced.values(), &[2.0, 3.0]);
    }

    #[test]
    fn slice_with_inverted_bounds_is_empty() {
        let s = hourly(&[1.0, 2.0]);
        let sliced = s.slice(
            Some(datetime!(2024-11-05 00:00:00 UTC)),
            Some(datetime!(2024-11-04 00:00:00 UTC)),
        );
        assert!(sliced.is_empty());
    }

    #[test]
    fn zip_with_propagates_nan() {
        let a = hourly(&[10.0, f64::NAN]);
        let b = hourly(&[1.0, 2.0]);
        let diff = a.zip_with(&b, |x, y| x - y);
        assert_eq!(diff.values()[0], 9.0);
        assert!(diff.values()[1].is_nan());
    }

    #[test]
    fn missing_point_serialises_as_null() {
        let p = Point::new(datetime!(2024-11-04 00:00:00 UTC), f64::NAN);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"ts":"2024-11-04T00:00:00Z","value":null}"#);
    }
}
