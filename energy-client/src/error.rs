use crate::domain::SeriesKey;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("missing column '{0}'")]
    KeyNotFound(String),
    #[error("unknown station '{0}'")]
    StationNotFound(String),
    #[error("column '{key}' has {actual} values, index has {expected}")]
    LengthMismatch {
        key: SeriesKey,
        expected: usize,
        actual: usize,
    },
    #[error("duplicate column '{0}'")]
    DuplicateKey(SeriesKey),
}
