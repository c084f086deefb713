//! Enrollment record data model

use chrono::{DateTime, Local};
use enroll_util::{CourseId, EnrollmentId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an enrollment.
///
/// The only legal transition is active -> expired; records are never
/// reactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Expired,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(EnrollmentStatus::Active),
            "expired" => Some(EnrollmentStatus::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored grant of time-boxed course access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    /// Surrogate key, assigned by the store
    pub id: EnrollmentId,

    pub user_id: UserId,
    pub course_id: CourseId,

    /// Server clock at insert time
    pub enrolled_at: DateTime<Local>,

    /// `enrolled_at + duration_days`
    pub expires_at: DateTime<Local>,

    pub status: EnrollmentStatus,
}

/// Fields of an enrollment prior to insertion
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub enrolled_at: DateTime<Local>,
    pub expires_at: DateTime<Local>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!(EnrollmentStatus::parse("active"), Some(EnrollmentStatus::Active));
        assert_eq!(EnrollmentStatus::parse("expired"), Some(EnrollmentStatus::Expired));
        assert_eq!(EnrollmentStatus::parse("bogus"), None);
        assert_eq!(EnrollmentStatus::Active.as_str(), "active");
    }
}
