//! Repository for the `users` table.

use cuvee_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, ParticipantWithStats, ProfileRow, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
                        role, is_active, needs_password_setup, last_login_at, \
                        created_at, updated_at";

/// Provides CRUD operations for user accounts.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, first_name, last_name, \
                                role, needs_password_setup)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.role)
            .bind(input.needs_password_setup)
            .fetch_one(pool)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user matching either the given username or email.
    ///
    /// Used as the duplicate pre-check during registration.
    pub async fn find_by_username_or_email(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1 OR email = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Stamp a successful login.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Replace the password hash. When `clear_setup` is true the
    /// `needs_password_setup` flag is reset (first-login flow).
    pub async fn set_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
        clear_setup: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET password_hash = $1, \
                              needs_password_setup = CASE WHEN $2 THEN FALSE \
                                                          ELSE needs_password_setup END, \
                              updated_at = NOW()
             WHERE id = $3",
        )
        .bind(password_hash)
        .bind(clear_setup)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List all participants with their tasting count and mean score.
    pub async fn list_participants_with_stats(
        pool: &PgPool,
        role: &str,
    ) -> Result<Vec<ParticipantWithStats>, sqlx::Error> {
        sqlx::query_as::<_, ParticipantWithStats>(
            "SELECT u.id, u.username, u.email, u.first_name, u.last_name, u.role, \
                    u.is_active, u.needs_password_setup, u.created_at, \
                    COUNT(t.id) AS tasting_count, \
                    AVG(t.final_score)::FLOAT8 AS average_score
             FROM users u
             LEFT JOIN tastings t ON t.user_id = u.id
             WHERE u.role = $1
             GROUP BY u.id
             ORDER BY u.created_at",
        )
        .bind(role)
        .fetch_all(pool)
        .await
    }

    /// Load a user's profile with embedded tasting statistics.
    pub async fn profile(pool: &PgPool, id: DbId) -> Result<Option<ProfileRow>, sqlx::Error> {
        sqlx::query_as::<_, ProfileRow>(
            "SELECT u.id, u.username, u.email, u.first_name, u.last_name, u.role, \
                    u.created_at, \
                    COUNT(t.id) AS total_tastings, \
                    AVG(t.final_score)::FLOAT8 AS average_score, \
                    MAX(t.final_score)::FLOAT8 AS best_score
             FROM users u
             LEFT JOIN tastings t ON t.user_id = u.id
             WHERE u.id = $1
             GROUP BY u.id",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Delete a user together with their tastings, enrollments, and
    /// reset tokens, in one transaction. Returns `true` if the user
    /// row existed.
    pub async fn delete_cascade(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM tastings WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM password_resets WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
