use std::fmt;

use serde::Serialize;

/// Active energy imported (kWh).
pub const EA_PLUS: &str = "EA+";
/// Active energy exported (kWh).
pub const EA_MINUS: &str = "EA-";
/// Reactive energy, inductive (kVArh).
pub const ER_PLUS: &str = "ER+";
/// Reactive energy, capacitive (kVArh).
pub const ER_MINUS: &str = "ER-";
/// Net active energy, `EA+ - EA-`. Derived, never stored in a source table.
pub const EA: &str = "EA";

/// Name of the synthetic station summing every physical station.
pub const ALL_STATIONS: &str = "All";

/// Whether `station` names the synthetic aggregate. `Total` is accepted as an alias.
pub fn is_all_stations(station: &str) -> bool {
    station == ALL_STATIONS || station == "Total"
}

/// Composite column key: one measurement recorded at one station.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SeriesKey {
    pub measurement: String,
    pub station: String,
}

impl SeriesKey {
    pub fn new(measurement: impl Into<String>, station: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            station: station.into(),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.measurement, self.station)
    }
}
