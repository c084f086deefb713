//! Batch enrollment entry point
//!
//! Accepts a newline-delimited list of email addresses and enrolls each
//! resolved user. Per-line failures are collected as messages; the batch
//! never aborts on a single failure.

use chrono::{DateTime, Local};
use enroll_util::{is_valid_email, CourseId};
use serde::Serialize;
use tracing::info;

use crate::EnrollmentService;

/// Aggregate result of a batch enrollment
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub success_count: usize,
    pub error_count: usize,

    /// Per-line error messages, in input line order
    pub errors: Vec<String>,
}

impl BatchOutcome {
    fn record_error(&mut self, message: String) {
        self.error_count += 1;
        self.errors.push(message);
    }
}

impl EnrollmentService {
    /// Enroll a batch of users identified by email, one address per line.
    ///
    /// Blank lines are skipped. Lines that fail email validation, directory
    /// resolution, or enrollment each contribute one error message and do
    /// not affect the rest of the batch.
    pub async fn enroll_batch(
        &self,
        emails: &str,
        course_id: CourseId,
        duration_days: i64,
        now: DateTime<Local>,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for line in emails.lines() {
            let email = line.trim();
            if email.is_empty() {
                continue;
            }

            if !is_valid_email(email) {
                outcome.record_error(format!("Invalid email: {}", email));
                continue;
            }

            let user_id = match self.directory().resolve_email(email).await {
                Ok(Some(id)) => id,
                Ok(None) => {
                    outcome.record_error(format!("User not found: {}", email));
                    continue;
                }
                Err(e) => {
                    outcome.record_error(format!("{}: {}", email, e));
                    continue;
                }
            };

            match self.enroll(user_id, course_id, duration_days, now).await {
                Ok(_) => outcome.success_count += 1,
                Err(e) => outcome.record_error(format!("{}: {}", email, e)),
            }
        }

        info!(
            course_id = %course_id,
            duration_days,
            success_count = outcome.success_count,
            error_count = outcome.error_count,
            "Batch enrollment processed"
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enroll_platform::{MockDirectory, MockGateway};
    use enroll_store::{EnrollmentStatus, EnrollmentStore, SqliteStore};
    use enroll_util::UserId;
    use std::sync::Arc;

    fn service() -> (EnrollmentService, Arc<SqliteStore>) {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let gateway = Arc::new(MockGateway::new());
        let directory = Arc::new(MockDirectory::new());

        directory.add_user("a@x.com", UserId::new(1));
        directory.add_user("c@x.com", UserId::new(3));
        directory.add_course(CourseId::new(10));

        let service = EnrollmentService::new(store.clone(), gateway, directory);
        (service, store)
    }

    #[tokio::test]
    async fn mixed_batch_collects_errors_in_order() {
        let (service, store) = service();

        let outcome = service
            .enroll_batch("a@x.com\nbad\nb@x.com", CourseId::new(10), 7, enroll_util::now())
            .await;

        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.error_count, 2);
        assert_eq!(
            outcome.errors,
            vec!["Invalid email: bad", "User not found: b@x.com"]
        );

        assert_eq!(
            store.list_by_status(EnrollmentStatus::Active, 100).unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn blank_lines_and_whitespace_are_skipped() {
        let (service, _store) = service();

        let outcome = service
            .enroll_batch("\n  a@x.com  \n\n", CourseId::new(10), 7, enroll_util::now())
            .await;

        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.error_count, 0);
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn duplicate_within_batch_becomes_a_line_error() {
        let (service, store) = service();

        let outcome = service
            .enroll_batch("a@x.com\na@x.com", CourseId::new(10), 7, enroll_util::now())
            .await;

        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.error_count, 1);
        assert!(outcome.errors[0].starts_with("a@x.com: "));
        assert_eq!(
            store.list_by_status(EnrollmentStatus::Active, 100).unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn enroll_errors_never_abort_later_lines() {
        let (service, _store) = service();

        // First line fails validation inside enroll; the second succeeds
        let outcome = service
            .enroll_batch("a@x.com\nc@x.com", CourseId::new(10), 0, enroll_util::now())
            .await;
        assert_eq!(outcome.success_count, 0);
        assert_eq!(outcome.error_count, 2);

        let outcome = service
            .enroll_batch("a@x.com\nc@x.com", CourseId::new(10), 7, enroll_util::now())
            .await;
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.error_count, 0);
    }
}
