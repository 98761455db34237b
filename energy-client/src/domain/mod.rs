pub mod forecast;
pub mod series_key;
pub mod table;
pub mod time_series;

pub use forecast::{ForecastField, ForecastTable};
pub use series_key::{is_all_stations, SeriesKey, ALL_STATIONS, EA, EA_MINUS, EA_PLUS, ER_MINUS, ER_PLUS};
pub use table::TimeSeriesTable;
pub use time_series::{Point, TimeSeries};
