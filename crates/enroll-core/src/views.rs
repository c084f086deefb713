//! Read-only query views
//!
//! Presentation-ready projections of enrollment records, with the remaining
//! time rendered as a human-readable string.

use chrono::{DateTime, Local};
use enroll_store::{EnrollmentRecord, EnrollmentStatus};
use enroll_util::{format_time_remaining, CourseId, EnrollmentId, UserId};
use serde::Serialize;

use crate::{EnrollError, EnrollmentService};

/// Seconds until a record's expiration, negative once it has passed
pub fn time_remaining(record: &EnrollmentRecord, now: DateTime<Local>) -> i64 {
    record.expires_at.signed_duration_since(now).num_seconds()
}

/// A single enrollment, projected for display
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentView {
    pub id: EnrollmentId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub enrolled_at: DateTime<Local>,
    pub expires_at: DateTime<Local>,
    pub status: EnrollmentStatus,

    /// Remaining time at projection instant, e.g. "2 days, 3 hours"
    pub remaining: String,
}

impl EnrollmentView {
    pub fn from_record(record: EnrollmentRecord, now: DateTime<Local>) -> Self {
        let remaining = match record.status {
            EnrollmentStatus::Active => format_time_remaining(time_remaining(&record, now)),
            EnrollmentStatus::Expired => "expired".to_string(),
        };

        Self {
            id: record.id,
            user_id: record.user_id,
            course_id: record.course_id,
            enrolled_at: record.enrolled_at,
            expires_at: record.expires_at,
            status: record.status,
            remaining,
        }
    }
}

impl EnrollmentService {
    /// List enrollments with the given status, soonest expiration first
    pub fn list_by_status(
        &self,
        status: EnrollmentStatus,
        limit: usize,
        now: DateTime<Local>,
    ) -> Result<Vec<EnrollmentView>, EnrollError> {
        let records = self.store().list_by_status(status, limit)?;
        Ok(records
            .into_iter()
            .map(|r| EnrollmentView::from_record(r, now))
            .collect())
    }

    /// List a user's active enrollments, soonest expiration first
    pub fn list_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Local>,
    ) -> Result<Vec<EnrollmentView>, EnrollError> {
        let records = self.store().list_active_for_user(user_id)?;
        Ok(records
            .into_iter()
            .map(|r| EnrollmentView::from_record(r, now))
            .collect())
    }

    /// List a course's active enrollments, soonest expiration first
    pub fn list_for_course(
        &self,
        course_id: CourseId,
        now: DateTime<Local>,
    ) -> Result<Vec<EnrollmentView>, EnrollError> {
        let records = self.store().list_active_for_course(course_id)?;
        Ok(records
            .into_iter()
            .map(|r| EnrollmentView::from_record(r, now))
            .collect())
    }
}
