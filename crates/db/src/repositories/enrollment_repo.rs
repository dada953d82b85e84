//! Repository for the `user_sessions` enrollment table.

use cuvee_core::types::DbId;
use sqlx::PgPool;

use crate::models::enrollment::{Enrollment, EnrollmentWithUser};

const COLUMNS: &str = "id, user_id, session_id, status, current_bottle, can_restart, joined_at";

/// Provides operations for participant enrollment.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Find a user's enrollment in a session.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        session_id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions WHERE user_id = $1 AND session_id = $2"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new enrollment with the default `waiting` state on
    /// bottle 1, returning the created row.
    ///
    /// The UNIQUE(user_id, session_id) constraint backs the handlers'
    /// find-then-create idempotency.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        session_id: DbId,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, session_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(session_id)
            .fetch_one(pool)
            .await
    }

    /// All enrollments in a session joined with user identity.
    pub async fn list_for_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<EnrollmentWithUser>, sqlx::Error> {
        sqlx::query_as::<_, EnrollmentWithUser>(
            "SELECT us.id, us.user_id, us.session_id, us.status, us.current_bottle, \
                    us.can_restart, us.joined_at, u.username, u.first_name, u.email
             FROM user_sessions us
             JOIN users u ON u.id = us.user_id
             WHERE us.session_id = $1
             ORDER BY us.joined_at",
        )
        .bind(session_id)
        .fetch_all(pool)
        .await
    }
}
