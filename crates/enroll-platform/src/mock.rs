//! Mock platform adapters for testing

use async_trait::async_trait;
use enroll_util::{CourseId, UserId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::{
    AccessGateway, Directory, DirectoryError, DirectoryResult, GatewayError, GatewayResult,
};

/// Mock access gateway for unit/integration testing
pub struct MockGateway {
    /// Report the gateway capability as missing
    pub unavailable: Arc<Mutex<bool>>,

    /// Configure grant to fail
    pub fail_grant: Arc<Mutex<bool>>,

    /// Configure revoke to fail
    pub fail_revoke: Arc<Mutex<bool>>,

    grants: Arc<Mutex<Vec<(UserId, CourseId)>>>,
    revokes: Arc<Mutex<Vec<(UserId, CourseId)>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            unavailable: Arc::new(Mutex::new(false)),
            fail_grant: Arc::new(Mutex::new(false)),
            fail_revoke: Arc::new(Mutex::new(false)),
            grants: Arc::new(Mutex::new(Vec::new())),
            revokes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Grant calls recorded so far, in call order
    pub fn grant_calls(&self) -> Vec<(UserId, CourseId)> {
        self.grants.lock().unwrap().clone()
    }

    /// Revoke calls recorded so far, in call order
    pub fn revoke_calls(&self) -> Vec<(UserId, CourseId)> {
        self.revokes.lock().unwrap().clone()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccessGateway for MockGateway {
    fn is_available(&self) -> bool {
        !*self.unavailable.lock().unwrap()
    }

    async fn grant(&self, user_id: UserId, course_id: CourseId) -> GatewayResult<()> {
        if *self.fail_grant.lock().unwrap() {
            return Err(GatewayError::GrantFailed("Mock grant failure".into()));
        }
        self.grants.lock().unwrap().push((user_id, course_id));
        Ok(())
    }

    async fn revoke(&self, user_id: UserId, course_id: CourseId) -> GatewayResult<()> {
        if *self.fail_revoke.lock().unwrap() {
            return Err(GatewayError::RevokeFailed("Mock revoke failure".into()));
        }
        self.revokes.lock().unwrap().push((user_id, course_id));
        Ok(())
    }
}

/// Mock user/course directory backed by in-memory maps
pub struct MockDirectory {
    /// Configure all lookups to fail
    pub fail_lookups: Arc<Mutex<bool>>,

    users: Arc<Mutex<HashMap<String, UserId>>>,
    courses: Arc<Mutex<HashSet<CourseId>>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self {
            fail_lookups: Arc::new(Mutex::new(false)),
            users: Arc::new(Mutex::new(HashMap::new())),
            courses: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Register a user reachable by email
    pub fn add_user(&self, email: impl Into<String>, user_id: UserId) {
        self.users.lock().unwrap().insert(email.into(), user_id);
    }

    /// Register a course of the expected type
    pub fn add_course(&self, course_id: CourseId) {
        self.courses.lock().unwrap().insert(course_id);
    }

    fn check_failure(&self) -> DirectoryResult<()> {
        if *self.fail_lookups.lock().unwrap() {
            Err(DirectoryError::Request("Mock lookup failure".into()))
        } else {
            Ok(())
        }
    }
}

impl Default for MockDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Directory for MockDirectory {
    async fn user_exists(&self, user_id: UserId) -> DirectoryResult<bool> {
        self.check_failure()?;
        Ok(self.users.lock().unwrap().values().any(|u| *u == user_id))
    }

    async fn resolve_email(&self, email: &str) -> DirectoryResult<Option<UserId>> {
        self.check_failure()?;
        Ok(self.users.lock().unwrap().get(email).copied())
    }

    async fn course_exists(&self, course_id: CourseId) -> DirectoryResult<bool> {
        self.check_failure()?;
        Ok(self.courses.lock().unwrap().contains(&course_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_gateway_records_calls() {
        let gateway = MockGateway::new();

        gateway.grant(UserId::new(1), CourseId::new(10)).await.unwrap();
        gateway.revoke(UserId::new(1), CourseId::new(10)).await.unwrap();

        assert_eq!(gateway.grant_calls(), vec![(UserId::new(1), CourseId::new(10))]);
        assert_eq!(gateway.revoke_calls(), vec![(UserId::new(1), CourseId::new(10))]);
    }

    #[tokio::test]
    async fn mock_gateway_failure_toggles() {
        let gateway = MockGateway::new();
        *gateway.fail_grant.lock().unwrap() = true;

        let result = gateway.grant(UserId::new(1), CourseId::new(10)).await;
        assert!(result.is_err());
        assert!(gateway.grant_calls().is_empty());
    }

    #[tokio::test]
    async fn mock_gateway_availability() {
        let gateway = MockGateway::new();
        assert!(gateway.is_available());

        *gateway.unavailable.lock().unwrap() = true;
        assert!(!gateway.is_available());
    }

    #[tokio::test]
    async fn mock_directory_lookups() {
        let directory = MockDirectory::new();
        directory.add_user("a@x.com", UserId::new(1));
        directory.add_course(CourseId::new(10));

        assert_eq!(
            directory.resolve_email("a@x.com").await.unwrap(),
            Some(UserId::new(1))
        );
        assert_eq!(directory.resolve_email("b@x.com").await.unwrap(), None);
        assert!(directory.user_exists(UserId::new(1)).await.unwrap());
        assert!(!directory.user_exists(UserId::new(2)).await.unwrap());
        assert!(directory.course_exists(CourseId::new(10)).await.unwrap());
        assert!(!directory.course_exists(CourseId::new(11)).await.unwrap());
    }
}
