//! Repository for the `tasting_sessions` table.

use cuvee_core::session::{STATUS_ACTIVE, STATUS_SETUP};
use cuvee_core::types::DbId;
use sqlx::PgPool;

use crate::models::tasting_session::{CreateSession, SessionOverview, TastingSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, type, status, created_by, created_at, updated_at";

/// Overview column list: session columns plus counts and creator name.
const OVERVIEW_COLUMNS: &str = "s.id, s.name, s.type, s.status, s.created_by, \
     s.created_at, s.updated_at, \
     (SELECT COUNT(*) FROM bottles b WHERE b.session_id = s.id) AS bottle_count, \
     (SELECT COUNT(*) FROM user_sessions us WHERE us.session_id = s.id) AS participant_count, \
     u.username AS created_by_name";

/// Provides lifecycle operations for tasting sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session (status starts at `setup`), returning the row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSession,
    ) -> Result<TastingSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasting_sessions (name, type, created_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TastingSession>(&query)
            .bind(&input.name)
            .bind(&input.session_type)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a session by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TastingSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasting_sessions WHERE id = $1");
        sqlx::query_as::<_, TastingSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All sessions, newest first, with bottle/participant counts and
    /// the creator's username.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<SessionOverview>, sqlx::Error> {
        let query = format!(
            "SELECT {OVERVIEW_COLUMNS}
             FROM tasting_sessions s
             JOIN users u ON u.id = s.created_by
             ORDER BY s.created_at DESC"
        );
        sqlx::query_as::<_, SessionOverview>(&query)
            .fetch_all(pool)
            .await
    }

    /// Active sessions only, for the participant-facing listing.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<SessionOverview>, sqlx::Error> {
        let query = format!(
            "SELECT {OVERVIEW_COLUMNS}
             FROM tasting_sessions s
             JOIN users u ON u.id = s.created_by
             WHERE s.status = $1
             ORDER BY s.created_at DESC"
        );
        sqlx::query_as::<_, SessionOverview>(&query)
            .bind(STATUS_ACTIVE)
            .fetch_all(pool)
            .await
    }

    /// Set a session's status without touching other rows.
    ///
    /// Use [`Self::activate`] for the `active` status. Returns `true`
    /// if the row existed.
    pub async fn set_status(pool: &PgPool, id: DbId, status: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasting_sessions SET status = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Activate a session, demoting every other active session back to
    /// `setup` in the same transaction.
    ///
    /// The demotion runs first so there is never an instant with two
    /// committed active rows. Returns `true` if the target existed.
    pub async fn activate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE tasting_sessions SET status = $1, updated_at = NOW()
             WHERE status = $2 AND id <> $3",
        )
        .bind(STATUS_SETUP)
        .bind(STATUS_ACTIVE)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            "UPDATE tasting_sessions SET status = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(STATUS_ACTIVE)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a session and everything registered under it: bottles,
    /// then enrollments, then the session row, in one transaction.
    ///
    /// Tastings are intentionally untouched -- they reference the user
    /// and a free-text bottle identifier, so ranking history survives
    /// session cleanup. Returns `true` if the session existed.
    pub async fn delete_cascade(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM bottles WHERE session_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM user_sessions WHERE session_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM tasting_sessions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
