//! Startup seeding for the arbiter account.

use cuvee_core::roles::ROLE_ARBITER;
use cuvee_db::models::user::CreateUser;
use cuvee_db::repositories::UserRepo;
use cuvee_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::ArbiterSeed;
use crate::error::AppError;

/// Ensure the arbiter account exists, creating it from the configured
/// seed credentials when absent. Idempotent across restarts.
pub async fn ensure_arbiter(pool: &DbPool, seed: &ArbiterSeed) -> Result<(), AppError> {
    if UserRepo::find_by_email(pool, &seed.email).await?.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?;

    let arbiter = UserRepo::create(
        pool,
        &CreateUser {
            username: seed.username.clone(),
            email: seed.email.clone(),
            password_hash,
            first_name: None,
            last_name: None,
            role: ROLE_ARBITER.to_string(),
            needs_password_setup: false,
        },
    )
    .await?;

    tracing::info!(email = %arbiter.email, "Arbiter account created");
    Ok(())
}
