//! Aggregation row shapes returned by `StatsRepo`.
//!
//! These structs map one-to-one onto single aggregate queries; score
//! formatting (one decimal digit) happens in the `api` crate.

use cuvee_core::types::Timestamp;
use sqlx::FromRow;

/// Per-user statistics with the four-bucket score distribution.
#[derive(Debug, FromRow)]
pub struct UserStatisticsRow {
    pub total_tastings: i64,
    pub average_score: Option<f64>,
    pub best_score: Option<f64>,
    pub worst_score: Option<f64>,
    pub excellent_count: i64,
    pub good_count: i64,
    pub average_count: i64,
    pub poor_count: i64,
    pub last_tasting_date: Option<Timestamp>,
    /// Distinct days with at least one tasting.
    pub active_days: i64,
}

/// One bottle group in the per-user ranking.
#[derive(Debug, FromRow)]
pub struct BottleRankingRow {
    pub bottle_identifier: String,
    pub wine_name: String,
    pub wine_type: Option<String>,
    pub vintage: Option<i32>,
    pub region: Option<String>,
    pub tasting_count: i64,
    pub average_score: f64,
    pub best_score: f64,
    pub worst_score: f64,
    pub last_tasting_date: Timestamp,
}

/// One bottle group in the global ranking (adds distinct taster count).
#[derive(Debug, FromRow)]
pub struct GlobalBottleRankingRow {
    pub bottle_identifier: String,
    pub wine_name: String,
    pub wine_type: Option<String>,
    pub vintage: Option<i32>,
    pub region: Option<String>,
    pub tasting_count: i64,
    pub average_score: f64,
    pub best_score: f64,
    pub worst_score: f64,
    pub last_tasting_date: Timestamp,
    pub user_count: i64,
}

/// Participant-visible global overview.
#[derive(Debug, FromRow)]
pub struct GlobalStatisticsRow {
    pub total_users: i64,
    pub total_tastings: i64,
    pub average_score: Option<f64>,
    pub highest_score: Option<f64>,
    pub active_days: i64,
    pub tastings_last_30_days: i64,
    pub new_users_last_30_days: i64,
}

/// Arbiter-only global aggregate.
#[derive(Debug, FromRow)]
pub struct DetailedGlobalRow {
    pub total_tastings: i64,
    pub total_tasters: i64,
    pub average_score: Option<f64>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
}

/// One row of the top-participant leaderboard.
#[derive(Debug, FromRow)]
pub struct TopTasterRow {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub tasting_count: i64,
    pub average_score: f64,
    pub best_score: f64,
}
