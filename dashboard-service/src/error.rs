use energy_client::TableError;

#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("data unavailable: {path}")]
    DataUnavailable { path: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("key not found: {0}")]
    KeyNotFound(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<TableError> for DashboardError {
    fn from(e: TableError) -> Self {
        match e {
            TableError::KeyNotFound(key) => Self::KeyNotFound(key),
            TableError::StationNotFound(station) => Self::KeyNotFound(format!("station '{station}'")),
            other => Self::Parse(other.to_string()),
        }
    }
}
