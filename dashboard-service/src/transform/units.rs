use std::{fmt, str::FromStr};

use energy_client::domain::TimeSeriesTable;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Display unit for active energy totals. Source tables are always in kWh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyUnit {
    #[serde(rename = "kWh")]
    Kwh,
    #[serde(rename = "MWh")]
    Mwh,
}

impl EnergyUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kwh => "kWh",
            Self::Mwh => "MWh",
        }
    }

    /// kWh per display unit.
    pub fn divisor(self) -> f64 {
        match self {
            Self::Kwh => 1.0,
            Self::Mwh => 1000.0,
        }
    }

    pub fn from_kwh(self, kwh: f64) -> f64 {
        kwh / self.divisor()
    }

    pub fn convert_table(self, table: &TimeSeriesTable) -> TimeSeriesTable {
        match self {
            Self::Kwh => table.clone(),
            Self::Mwh => table.map_values(|v| self.from_kwh(v)),
        }
    }
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyUnit {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kwh" => Ok(Self::Kwh),
            "mwh" => Ok(Self::Mwh),
            other => Err(DashboardError::InvalidArgument(format!(
                "unknown unit '{other}'; use kWh or MWh"
            ))),
        }
    }
}
