//! Password reset token model.

use cuvee_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Row from the `password_resets` table.
///
/// The token is an opaque 64-char hex string; it is only ever returned
/// to clients in development mode.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordReset {
    pub id: DbId,
    pub user_id: DbId,
    pub token: String,
    pub expires_at: Timestamp,
    pub used: bool,
    pub created_at: Timestamp,
}
