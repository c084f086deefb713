//! Persistence layer for enrolld
//!
//! Provides:
//! - The enrollment record data model
//! - The `EnrollmentStore` trait
//! - A SQLite-backed implementation
//!
//! Records are never physically deleted; expired enrollments are retained
//! as history.

mod record;
mod sqlite;
mod traits;

pub use record::*;
pub use sqlite::*;
pub use traits::*;

use enroll_util::EnrollmentId;
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Enrollment not found: {0}")]
    NotFound(EnrollmentId),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
