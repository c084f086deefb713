//! Trait interfaces for the host learning platform
//!
//! This crate defines the seam between the enrollment core and the platform
//! that actually owns users, courses, and course access. It contains no
//! platform code itself.

mod mock;
mod traits;

pub use mock::*;
pub use traits::*;
