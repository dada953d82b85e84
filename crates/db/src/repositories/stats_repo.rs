//! Read-only aggregation queries: per-user statistics, bottle
//! rankings, and global leaderboards.
//!
//! Grouping for rankings is the five-column tuple (bottle_identifier,
//! wine_name, wine_type, vintage, region); pagination totals count
//! distinct identifiers under the same filter. All queries are
//! side-effect-free.

use cuvee_core::scoring::{AVERAGE_THRESHOLD, EXCELLENT_THRESHOLD, GOOD_THRESHOLD};
use cuvee_core::types::DbId;
use sqlx::PgPool;

use crate::models::stats::{
    BottleRankingRow, DetailedGlobalRow, GlobalBottleRankingRow, GlobalStatisticsRow,
    TopTasterRow, UserStatisticsRow,
};

/// Filter shared by both ranking variants: identifiers that are NULL,
/// empty, or the literal string 'null' never form a ranking group.
const RANKABLE: &str =
    "bottle_identifier IS NOT NULL AND bottle_identifier <> '' AND bottle_identifier <> 'null'";

/// Size of the top-participant leaderboard.
const LEADERBOARD_SIZE: i64 = 10;

/// Provides the aggregate statistics and ranking queries.
pub struct StatsRepo;

impl StatsRepo {
    /// Per-user statistics: totals, score spread, four-bucket
    /// distribution, recency, and distinct active days.
    pub async fn user_statistics(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<UserStatisticsRow, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) AS total_tastings, \
                    AVG(final_score)::FLOAT8 AS average_score, \
                    MAX(final_score)::FLOAT8 AS best_score, \
                    MIN(final_score)::FLOAT8 AS worst_score, \
                    COUNT(*) FILTER (WHERE final_score >= {EXCELLENT_THRESHOLD}) AS excellent_count, \
                    COUNT(*) FILTER (WHERE final_score >= {GOOD_THRESHOLD} \
                                       AND final_score < {EXCELLENT_THRESHOLD}) AS good_count, \
                    COUNT(*) FILTER (WHERE final_score >= {AVERAGE_THRESHOLD} \
                                       AND final_score < {GOOD_THRESHOLD}) AS average_count, \
                    COUNT(*) FILTER (WHERE final_score < {AVERAGE_THRESHOLD}) AS poor_count, \
                    MAX(tasting_date) AS last_tasting_date, \
                    COUNT(DISTINCT tasting_date::date) AS active_days
             FROM tastings
             WHERE user_id = $1"
        );
        sqlx::query_as::<_, UserStatisticsRow>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// A page of the user's bottle ranking, best mean score first,
    /// ties broken by tasting count.
    pub async fn bottle_rankings(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BottleRankingRow>, sqlx::Error> {
        let query = format!(
            "SELECT bottle_identifier, wine_name, wine_type, vintage, region, \
                    COUNT(*) AS tasting_count, \
                    AVG(final_score)::FLOAT8 AS average_score, \
                    MAX(final_score)::FLOAT8 AS best_score, \
                    MIN(final_score)::FLOAT8 AS worst_score, \
                    MAX(tasting_date) AS last_tasting_date
             FROM tastings
             WHERE user_id = $1 AND {RANKABLE}
             GROUP BY bottle_identifier, wine_name, wine_type, vintage, region
             ORDER BY average_score DESC, tasting_count DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, BottleRankingRow>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total distinct bottle identifiers in the user's ranking.
    pub async fn count_bottle_groups(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(DISTINCT bottle_identifier) FROM tastings
             WHERE user_id = $1 AND {RANKABLE}"
        );
        let row: (i64,) = sqlx::query_as(&query).bind(user_id).fetch_one(pool).await?;
        Ok(row.0)
    }

    /// A page of the global bottle ranking across all users, with the
    /// distinct taster count per group.
    pub async fn global_bottle_rankings(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GlobalBottleRankingRow>, sqlx::Error> {
        let query = format!(
            "SELECT bottle_identifier, wine_name, wine_type, vintage, region, \
                    COUNT(*) AS tasting_count, \
                    AVG(final_score)::FLOAT8 AS average_score, \
                    MAX(final_score)::FLOAT8 AS best_score, \
                    MIN(final_score)::FLOAT8 AS worst_score, \
                    MAX(tasting_date) AS last_tasting_date, \
                    COUNT(DISTINCT user_id) AS user_count
             FROM tastings
             WHERE {RANKABLE}
             GROUP BY bottle_identifier, wine_name, wine_type, vintage, region
             ORDER BY average_score DESC, tasting_count DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, GlobalBottleRankingRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total distinct bottle identifiers in the global ranking.
    pub async fn count_global_bottle_groups(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let query =
            format!("SELECT COUNT(DISTINCT bottle_identifier) FROM tastings WHERE {RANKABLE}");
        let row: (i64,) = sqlx::query_as(&query).fetch_one(pool).await?;
        Ok(row.0)
    }

    /// Participant-visible overview: user/tasting totals, global mean,
    /// highest score, active days, and 30-day activity.
    pub async fn global_statistics(pool: &PgPool) -> Result<GlobalStatisticsRow, sqlx::Error> {
        sqlx::query_as::<_, GlobalStatisticsRow>(
            "SELECT COUNT(DISTINCT u.id) AS total_users, \
                    COUNT(t.id) AS total_tastings, \
                    AVG(t.final_score)::FLOAT8 AS average_score, \
                    MAX(t.final_score)::FLOAT8 AS highest_score, \
                    COUNT(DISTINCT t.tasting_date::date) AS active_days, \
                    COUNT(t.id) FILTER (WHERE t.tasting_date >= NOW() - INTERVAL '30 days') \
                        AS tastings_last_30_days, \
                    COUNT(DISTINCT u.id) FILTER (WHERE u.created_at >= NOW() - INTERVAL '30 days') \
                        AS new_users_last_30_days
             FROM users u
             LEFT JOIN tastings t ON t.user_id = u.id
             WHERE u.is_active",
        )
        .fetch_one(pool)
        .await
    }

    /// Arbiter-only global aggregate over every tasting.
    pub async fn detailed_global(pool: &PgPool) -> Result<DetailedGlobalRow, sqlx::Error> {
        sqlx::query_as::<_, DetailedGlobalRow>(
            "SELECT COUNT(*) AS total_tastings, \
                    COUNT(DISTINCT user_id) AS total_tasters, \
                    AVG(final_score)::FLOAT8 AS average_score, \
                    MIN(final_score)::FLOAT8 AS min_score, \
                    MAX(final_score)::FLOAT8 AS max_score
             FROM tastings",
        )
        .fetch_one(pool)
        .await
    }

    /// Top participants by mean score, restricted to those with at
    /// least one tasting.
    pub async fn top_tasters(pool: &PgPool, role: &str) -> Result<Vec<TopTasterRow>, sqlx::Error> {
        sqlx::query_as::<_, TopTasterRow>(
            "SELECT u.username, u.first_name, u.last_name, \
                    COUNT(t.id) AS tasting_count, \
                    AVG(t.final_score)::FLOAT8 AS average_score, \
                    MAX(t.final_score)::FLOAT8 AS best_score
             FROM users u
             JOIN tastings t ON t.user_id = u.id
             WHERE u.role = $1
             GROUP BY u.id
             ORDER BY average_score DESC
             LIMIT $2",
        )
        .bind(role)
        .bind(LEADERBOARD_SIZE)
        .fetch_all(pool)
        .await
    }
}
