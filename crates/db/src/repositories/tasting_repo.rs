//! Repository for the `tastings` table.
//!
//! Ownership is enforced at the query level: single-row reads and the
//! delete match both the tasting id and the owning user id, so one
//! user can never touch another's records regardless of role.

use cuvee_core::types::DbId;
use sqlx::PgPool;

use crate::models::tasting::{CreateTasting, Tasting, TastingWithUser};

const COLUMNS: &str = "id, user_id, bottle_identifier, wine_name, wine_type, vintage, \
                        region, appearance_score, aroma_score, taste_score, finish_score, \
                        final_score, notes, tasting_date, created_at, updated_at";

/// Provides operations for scored tastings.
pub struct TastingRepo;

impl TastingRepo {
    /// Insert a new tasting, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTasting) -> Result<Tasting, sqlx::Error> {
        let query = format!(
            "INSERT INTO tastings (user_id, bottle_identifier, wine_name, wine_type, \
                                   vintage, region, appearance_score, aroma_score, \
                                   taste_score, finish_score, final_score, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tasting>(&query)
            .bind(input.user_id)
            .bind(&input.bottle_identifier)
            .bind(&input.wine_name)
            .bind(&input.wine_type)
            .bind(input.vintage)
            .bind(&input.region)
            .bind(input.appearance_score)
            .bind(input.aroma_score)
            .bind(input.taste_score)
            .bind(input.finish_score)
            .bind(input.final_score)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Count a user's tastings.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tastings WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// A page of the user's tastings, most recent first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Tasting>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tastings
             WHERE user_id = $1
             ORDER BY tasting_date DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Tasting>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find a tasting owned by the given user.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Tasting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tastings WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Tasting>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a tasting owned by the given user. Returns `true` if a
    /// row matched both the id and the owner.
    pub async fn delete_owned(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tastings WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all tastings across users.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tastings")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// A page of every tasting joined with the taster's identity,
    /// most recent first.
    pub async fn list_all(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TastingWithUser>, sqlx::Error> {
        sqlx::query_as::<_, TastingWithUser>(
            "SELECT t.id, t.user_id, t.bottle_identifier, t.wine_name, t.wine_type, \
                    t.vintage, t.region, t.final_score, t.notes, t.tasting_date, \
                    u.username, u.first_name, u.last_name, u.email
             FROM tastings t
             JOIN users u ON u.id = t.user_id
             ORDER BY t.tasting_date DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }
}
