use energy_client::{
    domain::{TimeSeriesTable, EA_PLUS},
    queries::station_column,
};

use crate::{
    error::DashboardError,
    transform::{fold, Cycle},
    views::{resolve_station, OffsetPoint, PatternColumn, PatternView, ViewRequest},
};

/// Column ordering for pattern views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrder {
    OldestFirst,
    NewestFirst,
}

impl ColumnOrder {
    fn parse(s: Option<&str>) -> Result<Self, DashboardError> {
        match s.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("desc") | Some("newest") => Ok(Self::NewestFirst),
            Some("asc") | Some("oldest") => Ok(Self::OldestFirst),
            Some(other) => Err(DashboardError::InvalidArgument(format!(
                "unknown order '{other}'; use asc or desc"
            ))),
        }
    }
}

/// Imported active energy folded onto a week or month cycle.
pub fn pattern(table: &TimeSeriesTable, req: &ViewRequest) -> Result<PatternView, DashboardError> {
    let station = resolve_station(table, req.station.as_deref())?;
    let cycle: Cycle = req.cycle.as_deref().unwrap_or("week").parse()?;
    let order = ColumnOrder::parse(req.order.as_deref())?;

    let series = station_column(table, EA_PLUS, &station)?;
    let folded = fold(&series, cycle);
    let offset_days = folded.offset_days();
    let n = folded.cycles().len();

    let columns: Vec<_> = match order {
        ColumnOrder::OldestFirst => folded.iter_columns().collect(),
        ColumnOrder::NewestFirst => folded.iter_columns_desc().collect(),
    };

    let columns = columns
        .into_iter()
        .map(|(start, values)| {
            let age = folded.cycles().iter().filter(|c| **c > start).count();
            Ok(PatternColumn {
                label: cycle.label(start)?,
                opacity: recency_opacity(age, n),
                points: offset_days
                    .iter()
                    .zip(values)
                    .map(|(&offset_days, &value)| OffsetPoint { offset_days, value })
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>, DashboardError>>()?;

    Ok(PatternView {
        station,
        cycle,
        columns,
    })
}

/// 1.0 for the newest of `n` cycles (`age == 0`), fading linearly to 0.08.
fn recency_opacity(age: usize, n: usize) -> f64 {
    if n <= 1 {
        return 1.0;
    }
    1.0 - 0.92 * age as f64 / (n - 1) as f64
}
