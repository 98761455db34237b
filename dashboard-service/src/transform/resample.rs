use std::{fmt, str::FromStr};

use energy_client::domain::{TimeSeries, TimeSeriesTable};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime, Time, UtcOffset};

use crate::error::DashboardError;

/// Aggregation period for [`resample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[serde(rename = "6h")]
    SixHours,
    Day,
    Week,
    Month,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SixHours => "6h",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Label of the bucket containing `ts`.
    ///
    /// - 6h and day buckets are labelled by their start.
    /// - week buckets run Monday to Sunday and are labelled by the Sunday.
    /// - month buckets are labelled by the last day of the month.
    ///
    /// Fails when the label would lie past the last representable date.
    pub fn bucket_label(self, ts: OffsetDateTime) -> Result<OffsetDateTime, DashboardError> {
        let ts = ts.checked_to_offset(UtcOffset::UTC).ok_or_else(|| {
            DashboardError::InvalidArgument(format!("{ts} is out of the supported date range in UTC"))
        })?;
        let midnight = ts.replace_time(Time::MIDNIGHT);
        let shift = match self {
            Self::SixHours => Duration::hours(i64::from(ts.hour() / 6 * 6)),
            Self::Day => Duration::ZERO,
            Self::Week => Duration::days(6 - i64::from(ts.weekday().number_days_from_monday())),
            Self::Month => Duration::days(days_to_month_end(ts.date())),
        };
        self.shifted(midnight, shift)
    }

    /// Label of the bucket following the one labelled `label`.
    pub fn next_label(self, label: OffsetDateTime) -> Result<OffsetDateTime, DashboardError> {
        match self {
            Self::SixHours => self.shifted(label, Duration::hours(6)),
            Self::Day => self.shifted(label, Duration::days(1)),
            Self::Week => self.shifted(label, Duration::weeks(1)),
            Self::Month => {
                let first_of_next = self.shifted(label, Duration::days(1))?;
                self.shifted(first_of_next, Duration::days(days_to_month_end(first_of_next.date())))
            }
        }
    }

    fn shifted(self, ts: OffsetDateTime, by: Duration) -> Result<OffsetDateTime, DashboardError> {
        ts.checked_add(by).ok_or_else(|| {
            DashboardError::InvalidArgument(format!("{self} bucket after {ts} is out of the supported date range"))
        })
    }
}

fn days_to_month_end(date: Date) -> i64 {
    let last = time::util::days_in_year_month(date.year(), date.month());
    i64::from(last - date.day())
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "6h" | "6-hours" | "day (6h)" => Ok(Self::SixHours),
            "day" | "d" => Ok(Self::Day),
            "week" | "w" => Ok(Self::Week),
            "month" | "m" | "me" => Ok(Self::Month),
            other => Err(DashboardError::InvalidArgument(format!(
                "unknown period '{other}'; use 6h, day, week or month"
            ))),
        }
    }
}

/// Sum every column into `period` buckets.
///
/// Every bucket between the first and last label is emitted, so gaps in the
/// source show up as zero-sum rows. NaN cells are skipped; a trailing partial
/// bucket holds its partial sum.
pub fn resample(table: &TimeSeriesTable, period: &str) -> Result<TimeSeriesTable, DashboardError> {
    let period: Period = period.parse()?;
    resample_by(table, period)
}

pub fn resample_by(table: &TimeSeriesTable, period: Period) -> Result<TimeSeriesTable, DashboardError> {
    let columns: Vec<&[f64]> = table
        .keys()
        .filter_map(|key| table.column(key))
        .collect();
    let (labels, sums) = bucket_sums(table.index(), &columns, period)?;

    let mut out = TimeSeriesTable::new(labels);
    for (key, values) in table.keys().zip(sums) {
        out = out.with_column(key.clone(), values)?;
    }
    Ok(out)
}

/// Single-series variant of [`resample_by`].
pub fn resample_series(series: &TimeSeries, period: Period) -> Result<TimeSeries, DashboardError> {
    let (labels, mut sums) = bucket_sums(series.index(), &[series.values()], period)?;
    Ok(TimeSeries::new(labels, sums.pop().unwrap_or_default()))
}

/// Rows are placed by label lookup, so the index need not be sorted.
fn bucket_sums(
    index: &[OffsetDateTime],
    columns: &[&[f64]],
    period: Period,
) -> Result<(Vec<OffsetDateTime>, Vec<Vec<f64>>), DashboardError> {
    let row_labels = index
        .iter()
        .map(|ts| period.bucket_label(*ts))
        .collect::<Result<Vec<_>, _>>()?;
    let (Some(&first), Some(&last)) = (row_labels.iter().min(), row_labels.iter().max()) else {
        return Ok((Vec::new(), vec![Vec::new(); columns.len()]));
    };

    let mut labels = vec![first];
    let mut label = first;
    while label < last {
        label = period.next_label(label)?;
        labels.push(label);
    }

    let mut sums = vec![vec![0.0; labels.len()]; columns.len()];
    for (row, row_label) in row_labels.iter().enumerate() {
        let bucket = labels.binary_search(row_label).map_err(|_| {
            DashboardError::Parse(format!("{row_label} is not a {period} bucket boundary"))
        })?;
        for (col, values) in columns.iter().enumerate() {
            let v = values[row];
            if !v.is_nan() {
                sums[col][bucket] += v;
            }
        }
    }

    Ok((labels, sums))
}

#[cfg(test)]
mod tests {
    use super::*;
    use energy_client::domain::SeriesKey;
    use time::macros::datetime;

    fn quarter_hourly(start: OffsetDateTime, values: &[f64]) -> TimeSeries {
        TimeSeries::from_points(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + Duration::minutes(15 * i as i64), *v)),
        )
    }

    #[test]
    fn one_day_of_quarter_hours_sums_to_96() {
        let s = quarter_hourly(datetime!(2024-11-05 00:00:00 UTC), &[1.0; 96]);
        let daily = resample_series(&s, Period::Day).unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily.index()[0], datetime!(2024-11-05 00:00:00 UTC));
        assert_eq!(daily.values(), &[96.0]);
    }

    #[test]
    fn six_hour_buckets_start_at_midnight() {
        let s = quarter_hourly(datetime!(2024-11-05 00:00:00 UTC), &[1.0; 96]);
        let six = resample_series(&s, Period::SixHours).unwrap();
        assert_eq!(six.values(), &[24.0, 24.0, 24.0, 24.0]);
        assert_eq!(six.index()[3], datetime!(2024-11-05 18:00:00 UTC));
    }

    #[test]
    fn week_buckets_are_labelled_by_sunday() {
        assert_eq!(
            Period::Week.bucket_label(datetime!(2024-11-06 13:00:00 UTC)).unwrap(),
            datetime!(2024-11-10 00:00:00 UTC)
        );
        assert_eq!(
            Period::Week.bucket_label(datetime!(2024-11-10 23:45:00 UTC)).unwrap(),
            datetime!(2024-11-10 00:00:00 UTC)
        );
        assert_eq!(
            Period::Week.bucket_label(datetime!(2024-11-11 00:00:00 UTC)).unwrap(),
            datetime!(2024-11-17 00:00:00 UTC)
        );
    }

    #[test]
    fn month_buckets_are_labelled_by_month_end() {
        assert_eq!(
            Period::Month.bucket_label(datetime!(2024-02-03 10:00:00 UTC)).unwrap(),
            datetime!(2024-02-29 00:00:00 UTC)
        );
        assert_eq!(
            Period::Month.next_label(datetime!(2024-02-29 00:00:00 UTC)).unwrap(),
            datetime!(2024-03-31 00:00:00 UTC)
        );
        assert_eq!(
            Period::Month.next_label(datetime!(2024-12-31 00:00:00 UTC)).unwrap(),
            datetime!(2025-01-31 00:00:00 UTC)
        );
    }

    #[test]
    fn gaps_produce_zero_buckets_and_nan_is_skipped() {
        let s = TimeSeries::from_points([
            (datetime!(2024-11-01 10:00:00 UTC), 5.0),
            (datetime!(2024-11-01 11:00:00 UTC), f64::NAN),
            (datetime!(2024-11-03 09:00:00 UTC), 2.0),
        ]);
        let daily = resample_series(&s, Period::Day).unwrap();
        assert_eq!(daily.values(), &[5.0, 0.0, 2.0]);
        assert_eq!(daily.index()[1], datetime!(2024-11-02 00:00:00 UTC));
    }

    #[test]
    fn trailing_partial_bucket_is_kept() {
        let s = quarter_hourly(datetime!(2024-11-05 00:00:00 UTC), &[1.0; 100]);
        let daily = resample_series(&s, Period::Day).unwrap();
        assert_eq!(daily.values(), &[96.0, 4.0]);
    }

    #[test]
    fn table_resample_keeps_every_column_and_source() {
        let table = TimeSeriesTable::new(vec![
            datetime!(2024-11-05 00:00:00 UTC),
            datetime!(2024-11-05 12:00:00 UTC),
        ])
        .with_column(SeriesKey::new("EA+", "S1"), vec![1.0, 2.0])
        .unwrap()
        .with_column(SeriesKey::new("ER+", "S1"), vec![0.5, 0.25])
        .unwrap();

        let daily = resample(&table, "day").unwrap();

        assert_eq!(daily.column(&SeriesKey::new("EA+", "S1")).unwrap(), &[3.0]);
        assert_eq!(daily.column(&SeriesKey::new("ER+", "S1")).unwrap(), &[0.75]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn unknown_period_is_invalid_argument() {
        let res = resample(&TimeSeriesTable::default(), "fortnight");
        assert!(matches!(res, Err(DashboardError::InvalidArgument(_))));
    }

    #[test]
    fn period_aliases_parse() {
        assert_eq!("6-hours".parse::<Period>().unwrap(), Period::SixHours);
        assert_eq!("Day".parse::<Period>().unwrap(), Period::Day);
        assert_eq!("W".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("month".parse::<Period>().unwrap(), Period::Month);
    }

    #[test]
    fn unsorted_index_sums_into_the_right_days() {
        let table = TimeSeriesTable::new(vec![
            datetime!(2024-11-03 10:00:00 UTC),
            datetime!(2024-11-01 10:00:00 UTC),
            datetime!(2024-11-03 02:00:00 UTC),
        ])
        .with_column(SeriesKey::new("EA+", "S1"), vec![1.0, 2.0, 4.0])
        .unwrap();

        let daily = resample(&table, "day").unwrap();

        assert_eq!(daily.index()[0], datetime!(2024-11-01 00:00:00 UTC));
        assert_eq!(daily.column(&SeriesKey::new("EA+", "S1")).unwrap(), &[2.0, 0.0, 5.0]);
    }

    #[test]
    fn labels_past_the_last_date_are_an_error() {
        let s = TimeSeries::from_points([(datetime!(9999-12-30 10:00:00 UTC), 1.0)]);
        assert!(matches!(
            resample_series(&s, Period::Week),
            Err(DashboardError::InvalidArgument(_))
        ));
        assert!(matches!(
            resample_series(&s, Period::Month),
            Ok(ref monthly) if monthly.values() == [1.0]
        ));
    }

    #[test]
    fn sunday_night_and_monday_morning_fall_in_different_weeks() {
        let s = TimeSeries::from_points([
            (datetime!(2024-11-10 23:45:00 UTC), 3.0),
            (datetime!(2024-11-11 00:00:00 UTC), 7.0),
        ]);

        let weekly = resample_series(&s, Period::Week).unwrap();

        assert_eq!(
            weekly.index(),
            &[datetime!(2024-11-10 00:00:00 UTC), datetime!(2024-11-17 00:00:00 UTC)]
        );
        assert_eq!(weekly.values(), &[3.0, 7.0]);
    }

    #[test]
    fn month_end_and_next_month_start_are_summed_apart() {
        let s = TimeSeries::from_points([
            (datetime!(2024-01-31 23:45:00 UTC), 2.0),
            (datetime!(2024-01-31 12:00:00 UTC), 1.0),
            (datetime!(2024-02-01 00:00:00 UTC), 5.0),
        ]);

        let monthly = resample_series(&s, Period::Month).unwrap();

        assert_eq!(
            monthly.index(),
            &[datetime!(2024-01-31 00:00:00 UTC), datetime!(2024-02-29 00:00:00 UTC)]
        );
        assert_eq!(monthly.values(), &[3.0, 5.0]);
    }
}
