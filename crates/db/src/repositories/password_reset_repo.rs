//! Repository for the `password_resets` table.

use cuvee_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::password_reset::PasswordReset;

const COLUMNS: &str = "id, user_id, token, expires_at, used, created_at";

/// Provides operations for password reset tokens.
pub struct PasswordResetRepo;

impl PasswordResetRepo {
    /// Mark every unused token for a user as used.
    ///
    /// Called before inserting a fresh token so at most one unused,
    /// unexpired token is honored per user. Returns the count of
    /// invalidated tokens.
    pub async fn invalidate_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE password_resets SET used = TRUE WHERE user_id = $1 AND NOT used")
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Insert a new token, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        token: &str,
        expires_at: Timestamp,
    ) -> Result<PasswordReset, sqlx::Error> {
        let query = format!(
            "INSERT INTO password_resets (user_id, token, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(user_id)
            .bind(token)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find an unused, unexpired token.
    pub async fn find_valid(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<PasswordReset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM password_resets
             WHERE token = $1 AND NOT used AND expires_at > NOW()"
        );
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Mark a single token as used.
    pub async fn mark_used(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE password_resets SET used = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
