pub mod station_queries;

pub use station_queries::{measurements, station_column, stations};
