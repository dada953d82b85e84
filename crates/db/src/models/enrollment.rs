//! Participant enrollment (the `user_sessions` join table).

use cuvee_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Row from the `user_sessions` table. Serialized verbatim.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub id: DbId,
    pub user_id: DbId,
    pub session_id: DbId,
    pub status: String,
    pub current_bottle: i32,
    pub can_restart: bool,
    pub joined_at: Timestamp,
}

/// Enrollment joined with user identity, for the arbiter session view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EnrollmentWithUser {
    pub id: DbId,
    pub user_id: DbId,
    pub session_id: DbId,
    pub status: String,
    pub current_bottle: i32,
    pub can_restart: bool,
    pub joined_at: Timestamp,
    pub username: String,
    pub first_name: Option<String>,
    pub email: String,
}
