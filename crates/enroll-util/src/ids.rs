//! Strongly-typed identifiers for enrolld

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user in the platform directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Identifier of a course in the platform catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseId(i64);

impl CourseId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CourseId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Surrogate key of an enrollment record, assigned by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnrollmentId(i64);

impl EnrollmentId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EnrollmentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_equality() {
        let u1 = UserId::new(7);
        let u2 = UserId::new(7);
        let u3 = UserId::new(8);

        assert_eq!(u1, u2);
        assert_ne!(u1, u3);
    }

    #[test]
    fn ids_serialize_as_plain_integers() {
        let course = CourseId::new(123);
        let json = serde_json::to_string(&course).unwrap();
        assert_eq!(json, "123");

        let parsed: CourseId = serde_json::from_str(&json).unwrap();
        assert_eq!(course, parsed);
    }

    #[test]
    fn enrollment_ids_order_by_value() {
        assert!(EnrollmentId::new(1) < EnrollmentId::new(2));
    }
}
