//! The enrollment service

use chrono::{DateTime, Local};
use enroll_platform::{AccessGateway, Directory};
use enroll_store::{EnrollmentStore, NewEnrollment};
use enroll_util::{CourseId, EnrollmentId, UserId};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{EnrollError, MAX_DURATION_DAYS, MIN_DURATION_DAYS};

/// The enrollment service.
///
/// Owns handles to the store and the platform adapters; constructed
/// explicitly and passed by reference to whichever boundary layer needs it.
pub struct EnrollmentService {
    store: Arc<dyn EnrollmentStore>,
    gateway: Arc<dyn AccessGateway>,
    directory: Arc<dyn Directory>,
}

impl EnrollmentService {
    /// Create a new enrollment service
    pub fn new(
        store: Arc<dyn EnrollmentStore>,
        gateway: Arc<dyn AccessGateway>,
        directory: Arc<dyn Directory>,
    ) -> Self {
        info!(
            gateway_available = gateway.is_available(),
            "Enrollment service initialized"
        );

        Self {
            store,
            gateway,
            directory,
        }
    }

    /// Grant a user time-boxed access to a course.
    ///
    /// Validates the duration and both references, checks for an existing
    /// active enrollment, grants access through the gateway, and records the
    /// enrollment. Returns the new record's id.
    pub async fn enroll(
        &self,
        user_id: UserId,
        course_id: CourseId,
        duration_days: i64,
        now: DateTime<Local>,
    ) -> Result<EnrollmentId, EnrollError> {
        if !(MIN_DURATION_DAYS..=MAX_DURATION_DAYS).contains(&duration_days) {
            return Err(EnrollError::InvalidDuration(duration_days));
        }

        if !self.directory.user_exists(user_id).await? {
            return Err(EnrollError::InvalidReference(format!(
                "user {} does not exist",
                user_id
            )));
        }

        if !self.directory.course_exists(course_id).await? {
            return Err(EnrollError::InvalidReference(format!(
                "course {} does not exist",
                course_id
            )));
        }

        if !self.gateway.is_available() {
            return Err(EnrollError::DependencyUnavailable("access gateway"));
        }

        if let Some(existing) = self.store.find_active(user_id, course_id)? {
            debug!(
                user_id = %user_id,
                course_id = %course_id,
                existing_id = %existing.id,
                "Duplicate enrollment rejected"
            );
            return Err(EnrollError::DuplicateActive {
                existing_id: existing.id,
                expires_at: existing.expires_at,
            });
        }

        let expires_at = now + chrono::Duration::days(duration_days);

        self.gateway.grant(user_id, course_id).await?;

        // Access is granted at this point; a failed insert below leaves the
        // grant in place and surfaces the store error to the caller.
        let id = self.store.insert(&NewEnrollment {
            user_id,
            course_id,
            enrolled_at: now,
            expires_at,
        })?;

        info!(
            enrollment_id = %id,
            user_id = %user_id,
            course_id = %course_id,
            duration_days,
            expires_at = %expires_at,
            "Enrollment created"
        );

        Ok(id)
    }

    /// Revoke an enrollment by id.
    ///
    /// Revokes gateway access unconditionally, even for records that have
    /// already expired; the gateway treats revoke as idempotent. Succeeds
    /// only if the status flip persisted.
    pub async fn revoke(&self, id: EnrollmentId) -> Result<(), EnrollError> {
        let record = self.store.get(id)?.ok_or(EnrollError::NotFound(id))?;

        // Gateway failure is logged and not rolled back; the status flip
        // still proceeds so the record does not stay eligible forever.
        if let Err(e) = self.gateway.revoke(record.user_id, record.course_id).await {
            warn!(
                enrollment_id = %id,
                user_id = %record.user_id,
                course_id = %record.course_id,
                error = %e,
                "Gateway revoke failed"
            );
        }

        self.store.mark_expired(id)?;

        info!(
            enrollment_id = %id,
            user_id = %record.user_id,
            course_id = %record.course_id,
            "Enrollment revoked"
        );

        Ok(())
    }

    pub(crate) fn store(&self) -> &Arc<dyn EnrollmentStore> {
        &self.store
    }

    pub(crate) fn directory(&self) -> &Arc<dyn Directory> {
        &self.directory
    }

    /// Check that the service's store is reachable
    pub fn is_healthy(&self) -> bool {
        self.store.is_healthy()
    }
}
