//! Core enrollment service for enrolld
//!
//! This crate is the heart of enrolld, containing:
//! - Enrollment creation (validation, duplicate prevention, access grant)
//! - Revocation (access revoke, status flip)
//! - The expiration sweep
//! - The batch enrollment entry point
//! - Read-only query views for presentation

mod batch;
mod service;
mod sweep;
mod views;

pub use batch::*;
pub use service::*;
pub use sweep::*;
pub use views::*;

use chrono::{DateTime, Local};
use enroll_platform::{DirectoryError, GatewayError};
use enroll_store::StoreError;
use enroll_util::EnrollmentId;
use thiserror::Error;

/// Inclusive lower bound on enrollment duration in days
pub const MIN_DURATION_DAYS: i64 = 1;

/// Inclusive upper bound on enrollment duration in days
pub const MAX_DURATION_DAYS: i64 = 365;

/// Errors surfaced by enrollment operations
#[derive(Debug, Error)]
pub enum EnrollError {
    #[error("Duration must be between 1 and 365 days, got {0}")]
    InvalidDuration(i64),

    #[error("Invalid user or course: {0}")]
    InvalidReference(String),

    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(&'static str),

    #[error("Active enrollment already exists (id {existing_id}, expires {expires_at})")]
    DuplicateActive {
        existing_id: EnrollmentId,
        expires_at: DateTime<Local>,
    },

    #[error("Enrollment not found: {0}")]
    NotFound(EnrollmentId),

    #[error("Store error: {0}")]
    Persistence(#[from] StoreError),
}

// The error taxonomy has no transport kind; an adapter that cannot answer
// is reported as the dependency being unavailable.

impl From<GatewayError> for EnrollError {
    fn from(_: GatewayError) -> Self {
        EnrollError::DependencyUnavailable("access gateway")
    }
}

impl From<DirectoryError> for EnrollError {
    fn from(_: DirectoryError) -> Self {
        EnrollError::DependencyUnavailable("directory")
    }
}
