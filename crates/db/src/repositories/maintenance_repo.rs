//! Destructive maintenance operations (arbiter-only surface).

use sqlx::PgPool;

/// Provides whole-database maintenance operations.
pub struct MaintenanceRepo;

impl MaintenanceRepo {
    /// Wipe all tasting data and every non-arbiter account, in one
    /// transaction. Dependent tables go first to satisfy the foreign
    /// keys. Returns the number of deleted users.
    pub async fn reset_all_data(pool: &PgPool, arbiter_role: &str) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM user_sessions").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM bottles").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM tasting_sessions").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM tastings").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM password_resets").execute(&mut *tx).await?;
        let result = sqlx::query("DELETE FROM users WHERE role <> $1")
            .bind(arbiter_role)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted_users = result.rows_affected();
        tracing::info!(deleted_users, "All tasting data wiped");
        Ok(deleted_users)
    }
}
