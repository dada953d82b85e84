//! Tasting session entity model and joined shapes.

use cuvee_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Row from the `tasting_sessions` table.
///
/// Serialized verbatim (column names) in session endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TastingSession {
    pub id: DbId,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub session_type: String,
    pub status: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Session row enriched with counts and the creator's username, for
/// the arbiter listing and the participant-facing "available" listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionOverview {
    pub id: DbId,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub session_type: String,
    pub status: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub bottle_count: i64,
    pub participant_count: i64,
    pub created_by_name: String,
}

/// DTO for inserting a session.
#[derive(Debug)]
pub struct CreateSession {
    pub name: String,
    pub session_type: String,
    pub created_by: DbId,
}
