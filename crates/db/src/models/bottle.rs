//! Bottle entity model.

use cuvee_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Row from the `bottles` table. Serialized verbatim.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bottle {
    pub id: DbId,
    pub session_id: DbId,
    pub bottle_number: i32,
    pub custom_name: Option<String>,
    /// Opaque payload; stored and echoed back, never parsed.
    pub wine_details: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting a bottle.
#[derive(Debug)]
pub struct CreateBottle {
    pub session_id: DbId,
    pub bottle_number: i32,
    pub custom_name: Option<String>,
    pub wine_details: Option<String>,
}
