//! LMS REST adapter for enrolld
//!
//! Implements the access gateway and directory traits against the LMS
//! HTTP API. An unconfigured client reports the gateway as unavailable
//! rather than failing construction, so the daemon can still run
//! read-only operations without LMS credentials.

mod client;

pub use client::*;

use thiserror::Error;

/// Errors raised while constructing the LMS client
#[derive(Debug, Error)]
pub enum LmsError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}
