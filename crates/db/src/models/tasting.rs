//! Tasting entity model and DTOs.

use cuvee_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full row from the `tastings` table.
#[derive(Debug, Clone, FromRow)]
pub struct Tasting {
    pub id: DbId,
    pub user_id: DbId,
    pub bottle_identifier: Option<String>,
    pub wine_name: String,
    pub wine_type: Option<String>,
    pub vintage: Option<i32>,
    pub region: Option<String>,
    pub appearance_score: Option<i16>,
    pub aroma_score: Option<i16>,
    pub taste_score: Option<i16>,
    pub finish_score: Option<i16>,
    pub final_score: f64,
    pub notes: Option<String>,
    pub tasting_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a tasting. Defaults (midpoint sub-scores, wine
/// field placeholders) are applied by the handler before this is built.
#[derive(Debug)]
pub struct CreateTasting {
    pub user_id: DbId,
    pub bottle_identifier: Option<String>,
    pub wine_name: String,
    pub wine_type: String,
    pub vintage: i32,
    pub region: String,
    pub appearance_score: i16,
    pub aroma_score: i16,
    pub taste_score: i16,
    pub finish_score: i16,
    pub final_score: f64,
    pub notes: String,
}

/// Tasting joined with the taster's identity, for the arbiter listing.
#[derive(Debug, Clone, FromRow)]
pub struct TastingWithUser {
    pub id: DbId,
    pub user_id: DbId,
    pub bottle_identifier: Option<String>,
    pub wine_name: String,
    pub wine_type: Option<String>,
    pub vintage: Option<i32>,
    pub region: Option<String>,
    pub final_score: f64,
    pub notes: Option<String>,
    pub tasting_date: Timestamp,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}
