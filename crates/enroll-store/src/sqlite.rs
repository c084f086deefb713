//! SQLite-based store implementation

use chrono::{DateTime, Local};
use enroll_util::{CourseId, EnrollmentId, UserId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    EnrollmentRecord, EnrollmentStatus, EnrollmentStore, NewEnrollment, StoreError, StoreResult,
};

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            -- Enrollment records (rows are never deleted)
            CREATE TABLE IF NOT EXISTS enrollments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                course_id INTEGER NOT NULL,
                enrolled_at TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'active'
            );

            -- Indexes
            CREATE INDEX IF NOT EXISTS idx_enrollments_user ON enrollments(user_id);
            CREATE INDEX IF NOT EXISTS idx_enrollments_course ON enrollments(course_id);
            CREATE INDEX IF NOT EXISTS idx_enrollments_expires ON enrollments(expires_at);
            CREATE INDEX IF NOT EXISTS idx_enrollments_status ON enrollments(status);
            CREATE INDEX IF NOT EXISTS idx_enrollments_pair ON enrollments(user_id, course_id);

            -- At most one active enrollment per (user, course) pair
            CREATE UNIQUE INDEX IF NOT EXISTS idx_enrollments_active_pair
                ON enrollments(user_id, course_id) WHERE status = 'active';
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }

    fn query_records(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> StoreResult<Vec<EnrollmentRecord>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, row_to_raw)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(raw_to_record(row?));
        }
        Ok(records)
    }
}

/// Raw row tuple before timestamp parsing
type RawRow = (i64, i64, i64, String, String, String);

fn row_to_raw(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn raw_to_record(raw: RawRow) -> EnrollmentRecord {
    let (id, user_id, course_id, enrolled_at, expires_at, status) = raw;

    EnrollmentRecord {
        id: EnrollmentId::new(id),
        user_id: UserId::new(user_id),
        course_id: CourseId::new(course_id),
        enrolled_at: parse_timestamp(&enrolled_at),
        expires_at: parse_timestamp(&expires_at),
        status: EnrollmentStatus::parse(&status).unwrap_or(EnrollmentStatus::Expired),
    }
}

fn parse_timestamp(s: &str) -> DateTime<Local> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Local))
        .unwrap_or_else(|_| {
            warn!(value = %s, "Malformed timestamp in store");
            enroll_util::now()
        })
}

const SELECT_COLUMNS: &str = "id, user_id, course_id, enrolled_at, expires_at, status";

impl EnrollmentStore for SqliteStore {
    fn insert(&self, enrollment: &NewEnrollment) -> StoreResult<EnrollmentId> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            r#"
            INSERT INTO enrollments (user_id, course_id, enrolled_at, expires_at, status)
            VALUES (?, ?, ?, ?, 'active')
            "#,
            params![
                enrollment.user_id.as_i64(),
                enrollment.course_id.as_i64(),
                enrollment.enrolled_at.to_rfc3339(),
                enrollment.expires_at.to_rfc3339(),
            ],
        )?;

        let id = EnrollmentId::new(conn.last_insert_rowid());
        debug!(
            enrollment_id = %id,
            user_id = %enrollment.user_id,
            course_id = %enrollment.course_id,
            expires_at = %enrollment.expires_at,
            "Enrollment inserted"
        );

        Ok(id)
    }

    fn mark_expired(&self, id: EnrollmentId) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        let changed = conn.execute(
            "UPDATE enrollments SET status = 'expired' WHERE id = ?",
            [id.as_i64()],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        debug!(enrollment_id = %id, "Enrollment marked expired");
        Ok(())
    }

    fn get(&self, id: EnrollmentId) -> StoreResult<Option<EnrollmentRecord>> {
        let conn = self.conn.lock().unwrap();

        let raw = conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM enrollments WHERE id = ?"),
                [id.as_i64()],
                row_to_raw,
            )
            .optional()?;

        Ok(raw.map(raw_to_record))
    }

    fn find_active(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> StoreResult<Option<EnrollmentRecord>> {
        let conn = self.conn.lock().unwrap();

        let raw = conn
            .query_row(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM enrollments \
                     WHERE user_id = ? AND course_id = ? AND status = 'active'"
                ),
                params![user_id.as_i64(), course_id.as_i64()],
                row_to_raw,
            )
            .optional()?;

        Ok(raw.map(raw_to_record))
    }

    fn find_overdue(&self, now: DateTime<Local>) -> StoreResult<Vec<EnrollmentRecord>> {
        let conn = self.conn.lock().unwrap();

        Self::query_records(
            &conn,
            &format!(
                "SELECT {SELECT_COLUMNS} FROM enrollments \
                 WHERE status = 'active' AND expires_at <= ? \
                 ORDER BY expires_at ASC, id ASC"
            ),
            [now.to_rfc3339()],
        )
    }

    fn list_by_status(
        &self,
        status: EnrollmentStatus,
        limit: usize,
    ) -> StoreResult<Vec<EnrollmentRecord>> {
        let conn = self.conn.lock().unwrap();

        Self::query_records(
            &conn,
            &format!(
                "SELECT {SELECT_COLUMNS} FROM enrollments \
                 WHERE status = ? ORDER BY expires_at ASC, id ASC LIMIT ?"
            ),
            params![status.as_str(), limit as i64],
        )
    }

    fn list_active_for_user(&self, user_id: UserId) -> StoreResult<Vec<EnrollmentRecord>> {
        let conn = self.conn.lock().unwrap();

        Self::query_records(
            &conn,
            &format!(
                "SELECT {SELECT_COLUMNS} FROM enrollments \
                 WHERE user_id = ? AND status = 'active' \
                 ORDER BY expires_at ASC, id ASC"
            ),
            [user_id.as_i64()],
        )
    }

    fn list_active_for_course(&self, course_id: CourseId) -> StoreResult<Vec<EnrollmentRecord>> {
        let conn = self.conn.lock().unwrap();

        Self::query_records(
            &conn,
            &format!(
                "SELECT {SELECT_COLUMNS} FROM enrollments \
                 WHERE course_id = ? AND status = 'active' \
                 ORDER BY expires_at ASC, id ASC"
            ),
            [course_id.as_i64()],
        )
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}
