//! Repository for the `bottles` table.

use cuvee_core::types::DbId;
use sqlx::PgPool;

use crate::models::bottle::{Bottle, CreateBottle};

const COLUMNS: &str = "id, session_id, bottle_number, custom_name, wine_details, created_at";

/// Provides CRUD operations for session bottles.
pub struct BottleRepo;

impl BottleRepo {
    /// Insert a new bottle, returning the created row.
    ///
    /// Callers must run [`Self::number_exists`] first; session-scoped
    /// bottle-number uniqueness is a pre-check, not a constraint, and
    /// the window between the two statements is a known gap.
    pub async fn create(pool: &PgPool, input: &CreateBottle) -> Result<Bottle, sqlx::Error> {
        let query = format!(
            "INSERT INTO bottles (session_id, bottle_number, custom_name, wine_details)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bottle>(&query)
            .bind(input.session_id)
            .bind(input.bottle_number)
            .bind(&input.custom_name)
            .bind(&input.wine_details)
            .fetch_one(pool)
            .await
    }

    /// Whether a bottle with this number already exists in the session.
    pub async fn number_exists(
        pool: &PgPool,
        session_id: DbId,
        bottle_number: i32,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM bottles WHERE session_id = $1 AND bottle_number = $2",
        )
        .bind(session_id)
        .bind(bottle_number)
        .fetch_optional(pool)
        .await?;
        Ok(row.is_some())
    }

    /// All bottles in a session, ordered by bottle number.
    pub async fn list_for_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<Bottle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bottles WHERE session_id = $1 ORDER BY bottle_number"
        );
        sqlx::query_as::<_, Bottle>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a bottle. Returns `true` if the row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bottles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
