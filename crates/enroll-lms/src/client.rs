//! HTTP client against the LMS REST API

use async_trait::async_trait;
use enroll_config::LmsConfig;
use enroll_platform::{
    AccessGateway, Directory, DirectoryError, DirectoryResult, GatewayError, GatewayResult,
};
use enroll_util::{CourseId, UserId};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::LmsError;

/// LMS REST client.
///
/// Holds `None` when the daemon runs without an `[lms]` config section;
/// in that state `is_available` reports false and every remote call
/// returns the corresponding `Unavailable` error.
pub struct LmsClient {
    inner: Option<Inner>,
}

struct Inner {
    http: Client,
    base_url: String,
    api_token: String,
}

#[derive(Debug, Serialize)]
struct EnrollmentRequest {
    user_id: i64,
}

#[derive(Debug, Deserialize)]
struct UserSummary {
    id: i64,
}

fn course_users_path(course_id: CourseId) -> String {
    format!("/courses/{}/users", course_id)
}

fn course_user_path(course_id: CourseId, user_id: UserId) -> String {
    format!("/courses/{}/users/{}", course_id, user_id)
}

fn course_path(course_id: CourseId) -> String {
    format!("/courses/{}", course_id)
}

fn user_path(user_id: UserId) -> String {
    format!("/users/{}", user_id)
}

impl LmsClient {
    /// Build a client from the optional LMS config section
    pub fn new(config: Option<&LmsConfig>) -> Result<Self, LmsError> {
        let inner = match config {
            Some(config) => {
                let http = Client::builder()
                    .timeout(config.timeout)
                    .connect_timeout(config.timeout)
                    .build()?;

                info!(base_url = %config.base_url, "LMS client configured");

                Some(Inner {
                    http,
                    base_url: config.base_url.clone(),
                    api_token: config.api_token.clone(),
                })
            }
            None => {
                warn!("No LMS configured; enrollment operations will be refused");
                None
            }
        };

        Ok(Self { inner })
    }

    /// A client with no LMS behind it
    pub fn unconfigured() -> Self {
        Self { inner: None }
    }

    fn gateway_inner(&self) -> GatewayResult<&Inner> {
        self.inner.as_ref().ok_or(GatewayError::Unavailable)
    }

    fn directory_inner(&self) -> DirectoryResult<&Inner> {
        self.inner.as_ref().ok_or(DirectoryError::Unavailable)
    }
}

impl Inner {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a resource and report whether it exists. Any 2xx counts as
    /// existing, 404 as missing; other statuses are request failures.
    async fn exists(&self, path: &str) -> Result<bool, String> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        debug!(path = %path, status = %status, "LMS existence check");

        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(format!("unexpected status {}", status))
        }
    }
}

#[async_trait]
impl AccessGateway for LmsClient {
    fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    async fn grant(&self, user_id: UserId, course_id: CourseId) -> GatewayResult<()> {
        let inner = self.gateway_inner()?;

        let response = inner
            .http
            .post(inner.url(&course_users_path(course_id)))
            .bearer_auth(&inner.api_token)
            .json(&EnrollmentRequest {
                user_id: user_id.as_i64(),
            })
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::GrantFailed(format!(
                "LMS returned {} for user {} on course {}",
                status, user_id, course_id
            )));
        }

        debug!(user_id = %user_id, course_id = %course_id, "LMS access granted");
        Ok(())
    }

    async fn revoke(&self, user_id: UserId, course_id: CourseId) -> GatewayResult<()> {
        let inner = self.gateway_inner()?;

        let response = inner
            .http
            .delete(inner.url(&course_user_path(course_id, user_id)))
            .bearer_auth(&inner.api_token)
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let status = response.status();

        // The platform treats revoke as idempotent; a missing membership
        // is already the desired end state.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(GatewayError::RevokeFailed(format!(
                "LMS returned {} for user {} on course {}",
                status, user_id, course_id
            )));
        }

        debug!(user_id = %user_id, course_id = %course_id, "LMS access revoked");
        Ok(())
    }
}

#[async_trait]
impl Directory for LmsClient {
    async fn user_exists(&self, user_id: UserId) -> DirectoryResult<bool> {
        let inner = self.directory_inner()?;
        inner
            .exists(&user_path(user_id))
            .await
            .map_err(DirectoryError::Request)
    }

    async fn resolve_email(&self, email: &str) -> DirectoryResult<Option<UserId>> {
        let inner = self.directory_inner()?;

        let response = inner
            .http
            .get(inner.url("/users"))
            .bearer_auth(&inner.api_token)
            .query(&[("email", email)])
            .send()
            .await
            .map_err(|e| DirectoryError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Request(format!(
                "unexpected status {}",
                status
            )));
        }

        let users: Vec<UserSummary> = response
            .json()
            .await
            .map_err(|e| DirectoryError::Request(e.to_string()))?;

        Ok(users.first().map(|u| UserId::new(u.id)))
    }

    async fn course_exists(&self, course_id: CourseId) -> DirectoryResult<bool> {
        let inner = self.directory_inner()?;
        inner
            .exists(&course_path(course_id))
            .await
            .map_err(DirectoryError::Request)
    }
}
