use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use energy_client::domain::TimeSeries;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, Duration, OffsetDateTime, Time, UtcOffset};

use crate::error::DashboardError;

/// Repeating period a series is folded onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cycle {
    Week,
    Month,
}

impl Cycle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Display label of a cycle: `YYYY-MM-DD` (week start) or `YYYY-MM`.
    pub fn label(self, start: Date) -> Result<String, DashboardError> {
        let formatted = match self {
            Self::Week => start.format(format_description!("[year]-[month]-[day]")),
            Self::Month => start.format(format_description!("[year]-[month]")),
        };
        formatted.map_err(|e| DashboardError::Parse(format!("cannot format cycle start {start}: {e}")))
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cycle {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" | "w" => Ok(Self::Week),
            "month" | "m" => Ok(Self::Month),
            other => Err(DashboardError::InvalidArgument(format!(
                "unknown cycle '{other}'; use week or month"
            ))),
        }
    }
}

/// Start date of the cycle containing `ts` and the offset of `ts` within it.
///
/// Weeks start on Monday; months on the 1st.
pub fn cycle_position(ts: OffsetDateTime, cycle: Cycle) -> (Date, Duration) {
    let ts = ts.to_offset(UtcOffset::UTC);
    let time_of_day = ts.time() - Time::MIDNIGHT;
    let days_in = match cycle {
        Cycle::Week => i64::from(ts.weekday().number_days_from_monday()),
        Cycle::Month => i64::from(ts.day()) - 1,
    };
    let start = ts.date() - Duration::days(days_in);
    (start, Duration::days(days_in) + time_of_day)
}

/// A series pivoted to rows = offset within cycle, columns = cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CyclePattern {
    cycle: Cycle,
    offsets: Vec<Duration>,
    cycles: Vec<Date>,
    /// One column per entry of `cycles`, one cell per entry of `offsets`.
    columns: Vec<Vec<f64>>,
}

impl CyclePattern {
    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Row offsets, ascending.
    pub fn offsets(&self) -> &[Duration] {
        &self.offsets
    }

    /// Row offsets in fractional days.
    pub fn offset_days(&self) -> Vec<f64> {
        self.offsets
            .iter()
            .map(|d| d.as_seconds_f64() / 86_400.0)
            .collect()
    }

    /// Cycle start dates, ascending.
    pub fn cycles(&self) -> &[Date] {
        &self.cycles
    }

    pub fn column(&self, cycle_start: Date) -> Option<&[f64]> {
        self.cycles
            .binary_search(&cycle_start)
            .ok()
            .map(|i| self.columns[i].as_slice())
    }

    /// Columns oldest first.
    pub fn iter_columns(&self) -> impl Iterator<Item = (Date, &[f64])> + '_ {
        self.cycles
            .iter()
            .copied()
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Columns most recent first.
    pub fn iter_columns_desc(&self) -> impl Iterator<Item = (Date, &[f64])> + '_ {
        self.cycles
            .iter()
            .copied()
            .zip(self.columns.iter().map(Vec::as_slice))
            .rev()
    }
}

/// Fold `series` onto `cycle`, averaging every sample sharing an (offset, cycle) cell.
///
/// NaN samples are left out of the mean; a cell with no valid sample is NaN.
pub fn fold(series: &TimeSeries, cycle: Cycle) -> CyclePattern {
    let mut offsets = BTreeSet::new();
    let mut cycles = BTreeSet::new();
    let mut cells: BTreeMap<(Date, Duration), (f64, u32)> = BTreeMap::new();

    for (ts, value) in series.iter() {
        let (start, offset) = cycle_position(ts, cycle);
        offsets.insert(offset);
        cycles.insert(start);
        if value.is_nan() {
            continue;
        }
        let cell = cells.entry((start, offset)).or_insert((0.0, 0));
        cell.0 += value;
        cell.1 += 1;
    }

    let offsets: Vec<Duration> = offsets.into_iter().collect();
    let cycles: Vec<Date> = cycles.into_iter().collect();
    let columns = cycles
        .iter()
        .map(|start| {
            offsets
                .iter()
                .map(|offset| match cells.get(&(*start, *offset)) {
                    Some((sum, count)) => sum / f64::from(*count),
                    None => f64::NAN,
                })
                .collect()
        })
        .collect();

    CyclePattern {
        cycle,
        offsets,
        cycles,
        columns,
    }
}
