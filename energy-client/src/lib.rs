pub mod domain;
pub mod error;
pub mod queries;

pub use error::TableError;
