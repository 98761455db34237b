pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod sources;
pub mod state;
pub mod transform;
pub mod views;

pub use error::DashboardError;
pub use state::DashboardState;
