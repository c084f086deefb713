//! Shared utilities for enrolld
//!
//! This crate provides:
//! - ID types (UserId, CourseId, EnrollmentId)
//! - Time utilities (wall-clock access, remaining-time rendering)
//! - Email shape validation for the batch entry point

mod email;
mod ids;
mod time;

pub use email::*;
pub use ids::*;
pub use time::*;
