//! Store trait definitions

use chrono::{DateTime, Local};
use enroll_util::{CourseId, EnrollmentId, UserId};

use crate::{EnrollmentRecord, EnrollmentStatus, NewEnrollment, StoreResult};

/// Main store trait
pub trait EnrollmentStore: Send + Sync {
    // Writes

    /// Insert a new active enrollment and return its assigned id
    fn insert(&self, enrollment: &NewEnrollment) -> StoreResult<EnrollmentId>;

    /// Flip an enrollment's status to expired.
    ///
    /// Errors with `NotFound` if no row matched; applying it to an already
    /// expired row succeeds and leaves the status expired.
    fn mark_expired(&self, id: EnrollmentId) -> StoreResult<()>;

    // Lookups

    /// Fetch an enrollment by id
    fn get(&self, id: EnrollmentId) -> StoreResult<Option<EnrollmentRecord>>;

    /// Find the active enrollment for a (user, course) pair, if any
    fn find_active(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> StoreResult<Option<EnrollmentRecord>>;

    /// All active enrollments with `expires_at <= now`, soonest first
    fn find_overdue(&self, now: DateTime<Local>) -> StoreResult<Vec<EnrollmentRecord>>;

    // Query views

    /// Enrollments with the given status, ordered by expiration ascending
    fn list_by_status(
        &self,
        status: EnrollmentStatus,
        limit: usize,
    ) -> StoreResult<Vec<EnrollmentRecord>>;

    /// Active enrollments for a user, ordered by expiration ascending
    fn list_active_for_user(&self, user_id: UserId) -> StoreResult<Vec<EnrollmentRecord>>;

    /// Active enrollments for a course, ordered by expiration ascending
    fn list_active_for_course(&self, course_id: CourseId) -> StoreResult<Vec<EnrollmentRecord>>;

    // Health

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}
