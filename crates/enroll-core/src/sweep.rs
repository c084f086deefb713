//! Expiration sweep
//!
//! Driven by an external scheduler (the enrolld run loop, or a one-shot
//! invocation). Each run scans for active-and-overdue records and revokes
//! them sequentially. Failed revocations stay active and are picked up
//! again on the next run.

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::{EnrollError, EnrollmentService};

/// Result of one sweep run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Active records whose expiration had passed at sweep time
    pub due: usize,

    /// How many of those were successfully revoked this run
    pub revoked: usize,
}

impl EnrollmentService {
    /// Revoke every active enrollment whose expiration has passed.
    ///
    /// Runs to completion; there is no batching limit and no per-run retry.
    pub async fn sweep(&self, now: DateTime<Local>) -> Result<SweepOutcome, EnrollError> {
        let overdue = self.store().find_overdue(now)?;
        let due = overdue.len();

        let mut revoked = 0;
        for record in overdue {
            match self.revoke(record.id).await {
                Ok(()) => revoked += 1,
                Err(e) => {
                    // Left active; eligible again next run
                    warn!(
                        enrollment_id = %record.id,
                        error = %e,
                        "Failed to revoke overdue enrollment"
                    );
                }
            }
        }

        info!(due, revoked, "Expiration sweep complete");

        Ok(SweepOutcome { due, revoked })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enroll_platform::{MockDirectory, MockGateway};
    use enroll_store::{EnrollmentStatus, EnrollmentStore, NewEnrollment, SqliteStore};
    use enroll_util::{CourseId, EnrollmentId, UserId};
    use std::sync::Arc;

    fn service_with_store() -> (EnrollmentService, Arc<SqliteStore>, Arc<MockGateway>) {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let gateway = Arc::new(MockGateway::new());
        let directory = Arc::new(MockDirectory::new());
        let service = EnrollmentService::new(store.clone(), gateway.clone(), directory);
        (service, store, gateway)
    }

    fn seed(store: &SqliteStore, user: i64, expires_in_hours: i64) -> EnrollmentId {
        let now = enroll_util::now();
        store
            .insert(&NewEnrollment {
                user_id: UserId::new(user),
                course_id: CourseId::new(10),
                enrolled_at: now,
                expires_at: now + chrono::Duration::hours(expires_in_hours),
            })
            .unwrap()
    }

    #[tokio::test]
    async fn sweep_revokes_exactly_the_overdue() {
        let (service, store, gateway) = service_with_store();

        let overdue_a = seed(&store, 1, -2);
        let overdue_b = seed(&store, 2, -1);
        let current_a = seed(&store, 3, 1);
        let current_b = seed(&store, 4, 48);

        let outcome = service.sweep(enroll_util::now()).await.unwrap();
        assert_eq!(outcome, SweepOutcome { due: 2, revoked: 2 });

        for id in [overdue_a, overdue_b] {
            assert_eq!(store.get(id).unwrap().unwrap().status, EnrollmentStatus::Expired);
        }
        for id in [current_a, current_b] {
            assert_eq!(store.get(id).unwrap().unwrap().status, EnrollmentStatus::Active);
        }

        assert_eq!(gateway.revoke_calls().len(), 2);
    }

    #[tokio::test]
    async fn sweep_never_double_revokes() {
        let (service, store, _gateway) = service_with_store();
        seed(&store, 1, -1);

        let first = service.sweep(enroll_util::now()).await.unwrap();
        assert_eq!(first, SweepOutcome { due: 1, revoked: 1 });

        let second = service.sweep(enroll_util::now()).await.unwrap();
        assert_eq!(second, SweepOutcome { due: 0, revoked: 0 });
    }

    #[tokio::test]
    async fn sweep_with_nothing_due_is_a_no_op() {
        let (service, store, gateway) = service_with_store();
        seed(&store, 1, 5);

        let outcome = service.sweep(enroll_util::now()).await.unwrap();
        assert_eq!(outcome, SweepOutcome { due: 0, revoked: 0 });
        assert!(gateway.revoke_calls().is_empty());
    }

    #[tokio::test]
    async fn gateway_failure_does_not_block_the_sweep() {
        let (service, store, gateway) = service_with_store();
        let id = seed(&store, 1, -1);

        *gateway.fail_revoke.lock().unwrap() = true;

        // The gateway call is unchecked; the status flip persists and the
        // record counts as revoked.
        let outcome = service.sweep(enroll_util::now()).await.unwrap();
        assert_eq!(outcome, SweepOutcome { due: 1, revoked: 1 });
        assert_eq!(store.get(id).unwrap().unwrap().status, EnrollmentStatus::Expired);
    }
}
