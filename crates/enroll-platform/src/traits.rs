//! Platform adapter traits

use async_trait::async_trait;
use enroll_util::{CourseId, UserId};
use thiserror::Error;

/// Errors from access gateway operations
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Access gateway is not configured")]
    Unavailable,

    #[error("Grant failed: {0}")]
    GrantFailed(String),

    #[error("Revoke failed: {0}")]
    RevokeFailed(String),

    #[error("Request failed: {0}")]
    Request(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors from directory lookups
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Directory is not configured")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(String),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Course access gateway - the platform primitive that actually grants and
/// revokes access. Both operations are idempotent on the platform side.
#[async_trait]
pub trait AccessGateway: Send + Sync {
    /// Whether the gateway capability is present at all
    fn is_available(&self) -> bool {
        true
    }

    /// Grant a user access to a course
    async fn grant(&self, user_id: UserId, course_id: CourseId) -> GatewayResult<()>;

    /// Revoke a user's access to a course
    async fn revoke(&self, user_id: UserId, course_id: CourseId) -> GatewayResult<()>;
}

/// User/course directory - resolves identities and checks existence
#[async_trait]
pub trait Directory: Send + Sync {
    /// Check that a user exists
    async fn user_exists(&self, user_id: UserId) -> DirectoryResult<bool>;

    /// Resolve an email address to a user, if one matches
    async fn resolve_email(&self, email: &str) -> DirectoryResult<Option<UserId>>;

    /// Check that a course exists and is of the expected course type
    async fn course_exists(&self, course_id: CourseId) -> DirectoryResult<bool>;
}
