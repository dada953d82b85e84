//! Handlers for the `/tastings` resource: score submission, listings,
//! statistics, and bottle rankings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use cuvee_core::error::CoreError;
use cuvee_core::roles::ROLE_PARTICIPANT;
use cuvee_core::scoring::{
    format_optional_score, format_score, validate_final_score, DEFAULT_SUB_SCORE,
};
use cuvee_core::types::{DbId, Timestamp};
use cuvee_db::models::stats::{BottleRankingRow, GlobalBottleRankingRow};
use cuvee_db::models::tasting::{CreateTasting, Tasting, TastingWithUser};
use cuvee_db::repositories::{StatsRepo, TastingRepo};

use crate::error::{AppError, AppResult, FieldError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireArbiter;
use crate::query::{Pagination, PaginationParams, ADMIN_TASTINGS_PAGE_SIZE, DEFAULT_PAGE_SIZE};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validation::validate_payload;

/// Oldest accepted vintage year.
const MIN_VINTAGE: i32 = 1800;

/// Defaults applied to omitted wine fields; submission stays
/// frictionless at the cost of masking missing input.
const DEFAULT_WINE_NAME: &str = "Unnamed wine";
const DEFAULT_WINE_TYPE: &str = "Red";
const DEFAULT_REGION: &str = "Unspecified";
const DEFAULT_NOTES: &str = "Recorded via the tasting app";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /tastings`.
///
/// Only the final score is mandatory; sub-scores default to the scale
/// midpoint and wine fields to placeholders.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTastingRequest {
    pub bottle_identifier: Option<String>,
    #[validate(length(max = 255, message = "Wine name must not exceed 255 characters"))]
    pub wine_name: Option<String>,
    #[validate(length(max = 50, message = "Wine type must not exceed 50 characters"))]
    pub wine_type: Option<String>,
    pub wine_vintage: Option<i32>,
    #[validate(length(max = 255, message = "Region must not exceed 255 characters"))]
    pub wine_region: Option<String>,
    #[validate(custom(function = final_score_rule))]
    pub final_score: f64,
    #[validate(range(min = 1, max = 5, message = "Appearance score must be between 1 and 5"))]
    pub appearance_score: Option<i16>,
    #[validate(range(min = 1, max = 5, message = "Aroma score must be between 1 and 5"))]
    pub aroma_score: Option<i16>,
    #[validate(range(min = 1, max = 5, message = "Taste score must be between 1 and 5"))]
    pub taste_score: Option<i16>,
    #[validate(range(min = 1, max = 5, message = "Finish score must be between 1 and 5"))]
    pub finish_score: Option<i16>,
    #[validate(length(max = 1000, message = "Notes must not exceed 1000 characters"))]
    pub notes: Option<String>,
}

/// Payload returned by `POST /tastings`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTastingData {
    pub id: DbId,
    pub tasting_date: Timestamp,
    pub final_score: f64,
}

/// Wine descriptor embedded in tasting and ranking payloads.
#[derive(Debug, Serialize)]
pub struct WineInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub wine_type: Option<String>,
    pub vintage: Option<i32>,
    pub region: Option<String>,
}

/// One tasting in the owner's listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TastingSummary {
    pub id: DbId,
    pub bottle_identifier: Option<String>,
    pub final_score: f64,
    pub tasting_date: Timestamp,
    pub wine: WineInfo,
    pub notes: Option<String>,
}

/// Paginated listing payload.
#[derive(Debug, Serialize)]
pub struct TastingListData {
    pub tastings: Vec<TastingSummary>,
    pub pagination: Pagination,
}

/// Full single-tasting payload including sub-scores.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TastingDetail {
    pub id: DbId,
    pub bottle_identifier: Option<String>,
    pub final_score: f64,
    pub tasting_date: Timestamp,
    pub wine: WineInfo,
    pub scores: SubScores,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubScores {
    pub appearance: Option<i16>,
    pub aroma: Option<i16>,
    pub taste: Option<i16>,
    pub finish: Option<i16>,
}

/// Per-user statistics payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatisticsData {
    pub total_tastings: i64,
    pub average_score: Option<String>,
    pub best_score: Option<String>,
    pub worst_score: Option<String>,
    pub distribution: Distribution,
    pub last_tasting_date: Option<Timestamp>,
    pub active_days: i64,
}

/// Four-bucket score distribution.
#[derive(Debug, Serialize)]
pub struct Distribution {
    pub excellent: i64,
    pub good: i64,
    pub average: i64,
    pub poor: i64,
}

/// Participant-visible global overview payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStatisticsData {
    pub total_users: i64,
    pub total_tastings: i64,
    pub global_average_score: Option<String>,
    pub highest_score: Option<String>,
    pub active_days: i64,
    pub recent_activity: RecentActivity,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub tastings_last_30_days: i64,
    pub new_users_last_30_days: i64,
}

/// One entry of a bottle ranking page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    /// 1-based position in the full ordered result.
    pub rank: i64,
    pub bottle_identifier: String,
    pub wine: WineInfo,
    pub statistics: RankingStats,
    pub last_tasting_date: Timestamp,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingStats {
    pub tasting_count: i64,
    pub average_score: String,
    pub best_score: String,
    pub worst_score: String,
    /// Distinct tasters; present in the global ranking only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_count: Option<i64>,
}

/// Paginated ranking payload.
#[derive(Debug, Serialize)]
pub struct RankingListData {
    pub rankings: Vec<RankingEntry>,
    pub pagination: Pagination,
}

/// One tasting in the arbiter's all-tastings listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminTastingSummary {
    pub id: DbId,
    pub bottle_identifier: Option<String>,
    pub final_score: f64,
    pub tasting_date: Timestamp,
    pub wine: WineInfo,
    pub notes: Option<String>,
    pub user: TasterIdentity,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TasterIdentity {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

/// Paginated arbiter listing payload.
#[derive(Debug, Serialize)]
pub struct AdminTastingListData {
    pub tastings: Vec<AdminTastingSummary>,
    pub pagination: Pagination,
}

/// Arbiter-only detailed statistics payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedStatisticsData {
    pub global: GlobalAggregate,
    pub top_users: Vec<TopUser>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalAggregate {
    pub total_tastings: i64,
    pub total_users: i64,
    pub average_score: Option<String>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUser {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub tasting_count: i64,
    pub average_score: String,
    pub best_score: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/tastings
///
/// Record a tasting. Returns 201 Created with the new id and date.
pub async fn create_tasting(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<CreateTastingRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedTastingData>>)> {
    validate_payload(&input)?;

    let current_year = Utc::now().year();
    if let Some(vintage) = input.wine_vintage {
        if vintage < MIN_VINTAGE || vintage > current_year {
            return Err(AppError::FieldValidation(vec![FieldError {
                field: "wineVintage".to_string(),
                message: format!("Vintage must be between {MIN_VINTAGE} and {current_year}"),
            }]));
        }
    }

    let tasting = TastingRepo::create(
        &state.pool,
        &CreateTasting {
            user_id: user.user_id,
            bottle_identifier: input.bottle_identifier.filter(|s| !s.is_empty()),
            wine_name: input
                .wine_name
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_WINE_NAME.to_string()),
            wine_type: input
                .wine_type
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_WINE_TYPE.to_string()),
            vintage: input.wine_vintage.unwrap_or(current_year),
            region: input
                .wine_region
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            appearance_score: input.appearance_score.unwrap_or(DEFAULT_SUB_SCORE),
            aroma_score: input.aroma_score.unwrap_or(DEFAULT_SUB_SCORE),
            taste_score: input.taste_score.unwrap_or(DEFAULT_SUB_SCORE),
            finish_score: input.finish_score.unwrap_or(DEFAULT_SUB_SCORE),
            final_score: input.final_score,
            notes: input.notes.unwrap_or_else(|| DEFAULT_NOTES.to_string()),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Tasting recorded successfully",
            CreatedTastingData {
                id: tasting.id,
                tasting_date: tasting.tasting_date,
                final_score: tasting.final_score,
            },
        )),
    ))
}

/// GET /api/tastings
///
/// The caller's tastings, most recent first, paginated.
pub async fn list_tastings(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<TastingListData>>> {
    let page = params.page();
    let limit = params.limit_or(DEFAULT_PAGE_SIZE);
    let offset = params.offset_or(DEFAULT_PAGE_SIZE);

    let total = TastingRepo::count_for_user(&state.pool, user.user_id).await?;
    let rows = TastingRepo::list_for_user(&state.pool, user.user_id, limit, offset).await?;

    Ok(Json(ApiResponse::data(TastingListData {
        tastings: rows.iter().map(tasting_summary).collect(),
        pagination: Pagination::new(page, limit, total),
    })))
}

/// GET /api/tastings/{id}
///
/// One tasting with sub-scores. 404 unless owned by the caller.
pub async fn get_tasting(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<TastingDetail>>> {
    let tasting = TastingRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tasting",
            id,
        }))?;

    Ok(Json(ApiResponse::data(TastingDetail {
        id: tasting.id,
        bottle_identifier: tasting.bottle_identifier.clone(),
        final_score: tasting.final_score,
        tasting_date: tasting.tasting_date,
        wine: wine_info(
            &tasting.wine_name,
            tasting.wine_type.as_deref(),
            tasting.vintage,
            tasting.region.as_deref(),
        ),
        scores: SubScores {
            appearance: tasting.appearance_score,
            aroma: tasting.aroma_score,
            taste: tasting.taste_score,
            finish: tasting.finish_score,
        },
        notes: tasting.notes,
    })))
}

/// DELETE /api/tastings/{id}
///
/// Delete one of the caller's tastings. The query matches both id and
/// owner, so other users' records always report 404.
pub async fn delete_tasting(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !TastingRepo::delete_owned(&state.pool, id, user.user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Tasting",
            id,
        }));
    }
    Ok(Json(ApiResponse::message("Tasting deleted successfully")))
}

/// GET /api/tastings/statistics
///
/// The caller's aggregate statistics.
pub async fn user_statistics(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserStatisticsData>>> {
    let stats = StatsRepo::user_statistics(&state.pool, user.user_id).await?;

    Ok(Json(ApiResponse::data(UserStatisticsData {
        total_tastings: stats.total_tastings,
        average_score: format_optional_score(stats.average_score),
        best_score: format_optional_score(stats.best_score),
        worst_score: format_optional_score(stats.worst_score),
        distribution: Distribution {
            excellent: stats.excellent_count,
            good: stats.good_count,
            average: stats.average_count,
            poor: stats.poor_count,
        },
        last_tasting_date: stats.last_tasting_date,
        active_days: stats.active_days,
    })))
}

/// GET /api/tastings/global-statistics
///
/// Community-wide overview visible to every authenticated user.
pub async fn global_statistics(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<Json<ApiResponse<GlobalStatisticsData>>> {
    let stats = StatsRepo::global_statistics(&state.pool).await?;

    Ok(Json(ApiResponse::data(GlobalStatisticsData {
        total_users: stats.total_users,
        total_tastings: stats.total_tastings,
        global_average_score: format_optional_score(stats.average_score),
        highest_score: format_optional_score(stats.highest_score),
        active_days: stats.active_days,
        recent_activity: RecentActivity {
            tastings_last_30_days: stats.tastings_last_30_days,
            new_users_last_30_days: stats.new_users_last_30_days,
        },
    })))
}

/// GET /api/tastings/rankings
///
/// The caller's bottle leaderboard, best mean score first.
pub async fn bottle_rankings(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<RankingListData>>> {
    let page = params.page();
    let limit = params.limit_or(DEFAULT_PAGE_SIZE);
    let offset = params.offset_or(DEFAULT_PAGE_SIZE);

    let rows = StatsRepo::bottle_rankings(&state.pool, user.user_id, limit, offset).await?;
    let total = StatsRepo::count_bottle_groups(&state.pool, user.user_id).await?;

    let rankings = rows
        .iter()
        .enumerate()
        .map(|(index, row)| user_ranking_entry(row, offset + index as i64 + 1))
        .collect();

    Ok(Json(ApiResponse::data(RankingListData {
        rankings,
        pagination: Pagination::new(page, limit, total),
    })))
}

// ---------------------------------------------------------------------------
// Arbiter handlers
// ---------------------------------------------------------------------------

/// GET /api/tastings/admin/all
///
/// Every tasting with the taster's identity, paginated (default 50).
pub async fn list_all_tastings(
    State(state): State<AppState>,
    RequireArbiter(_arbiter): RequireArbiter,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<AdminTastingListData>>> {
    let page = params.page();
    let limit = params.limit_or(ADMIN_TASTINGS_PAGE_SIZE);
    let offset = params.offset_or(ADMIN_TASTINGS_PAGE_SIZE);

    let total = TastingRepo::count_all(&state.pool).await?;
    let rows = TastingRepo::list_all(&state.pool, limit, offset).await?;

    Ok(Json(ApiResponse::data(AdminTastingListData {
        tastings: rows.iter().map(admin_tasting_summary).collect(),
        pagination: Pagination::new(page, limit, total),
    })))
}

/// GET /api/tastings/admin/detailed-statistics
///
/// Global aggregate plus the top-10 participant leaderboard.
pub async fn detailed_statistics(
    State(state): State<AppState>,
    RequireArbiter(_arbiter): RequireArbiter,
) -> AppResult<Json<ApiResponse<DetailedStatisticsData>>> {
    let global = StatsRepo::detailed_global(&state.pool).await?;
    let top = StatsRepo::top_tasters(&state.pool, ROLE_PARTICIPANT).await?;

    Ok(Json(ApiResponse::data(DetailedStatisticsData {
        global: GlobalAggregate {
            total_tastings: global.total_tastings,
            total_users: global.total_tasters,
            average_score: format_optional_score(global.average_score),
            min_score: global.min_score,
            max_score: global.max_score,
        },
        top_users: top
            .into_iter()
            .map(|row| TopUser {
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
                tasting_count: row.tasting_count,
                average_score: format_score(row.average_score),
                best_score: format_score(row.best_score),
            })
            .collect(),
    })))
}

/// GET /api/tastings/admin/rankings
///
/// The bottle leaderboard across all users.
pub async fn global_bottle_rankings(
    State(state): State<AppState>,
    RequireArbiter(_arbiter): RequireArbiter,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<RankingListData>>> {
    let page = params.page();
    let limit = params.limit_or(DEFAULT_PAGE_SIZE);
    let offset = params.offset_or(DEFAULT_PAGE_SIZE);

    let rows = StatsRepo::global_bottle_rankings(&state.pool, limit, offset).await?;
    let total = StatsRepo::count_global_bottle_groups(&state.pool).await?;

    let rankings = rows
        .iter()
        .enumerate()
        .map(|(index, row)| global_ranking_entry(row, offset + index as i64 + 1))
        .collect();

    Ok(Json(ApiResponse::data(RankingListData {
        rankings,
        pagination: Pagination::new(page, limit, total),
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validator-compatible wrapper around the core score range rule.
fn final_score_rule(score: f64) -> Result<(), ValidationError> {
    validate_final_score(score).map_err(|msg| {
        let mut err = ValidationError::new("final_score_range");
        err.message = Some(msg.into());
        err
    })
}

fn wine_info(
    name: &str,
    wine_type: Option<&str>,
    vintage: Option<i32>,
    region: Option<&str>,
) -> WineInfo {
    WineInfo {
        name: name.to_string(),
        wine_type: wine_type.map(str::to_string),
        vintage,
        region: region.map(str::to_string),
    }
}

fn tasting_summary(tasting: &Tasting) -> TastingSummary {
    TastingSummary {
        id: tasting.id,
        bottle_identifier: tasting.bottle_identifier.clone(),
        final_score: tasting.final_score,
        tasting_date: tasting.tasting_date,
        wine: wine_info(
            &tasting.wine_name,
            tasting.wine_type.as_deref(),
            tasting.vintage,
            tasting.region.as_deref(),
        ),
        notes: tasting.notes.clone(),
    }
}

fn admin_tasting_summary(tasting: &TastingWithUser) -> AdminTastingSummary {
    AdminTastingSummary {
        id: tasting.id,
        bottle_identifier: tasting.bottle_identifier.clone(),
        final_score: tasting.final_score,
        tasting_date: tasting.tasting_date,
        wine: wine_info(
            &tasting.wine_name,
            tasting.wine_type.as_deref(),
            tasting.vintage,
            tasting.region.as_deref(),
        ),
        notes: tasting.notes.clone(),
        user: TasterIdentity {
            username: tasting.username.clone(),
            first_name: tasting.first_name.clone(),
            last_name: tasting.last_name.clone(),
            email: tasting.email.clone(),
        },
    }
}

fn user_ranking_entry(row: &BottleRankingRow, rank: i64) -> RankingEntry {
    RankingEntry {
        rank,
        bottle_identifier: row.bottle_identifier.clone(),
        wine: wine_info(
            &row.wine_name,
            row.wine_type.as_deref(),
            row.vintage,
            row.region.as_deref(),
        ),
        statistics: RankingStats {
            tasting_count: row.tasting_count,
            average_score: format_score(row.average_score),
            best_score: format_score(row.best_score),
            worst_score: format_score(row.worst_score),
            user_count: None,
        },
        last_tasting_date: row.last_tasting_date,
    }
}

fn global_ranking_entry(row: &GlobalBottleRankingRow, rank: i64) -> RankingEntry {
    RankingEntry {
        rank,
        bottle_identifier: row.bottle_identifier.clone(),
        wine: wine_info(
            &row.wine_name,
            row.wine_type.as_deref(),
            row.vintage,
            row.region.as_deref(),
        ),
        statistics: RankingStats {
            tasting_count: row.tasting_count,
            average_score: format_score(row.average_score),
            best_score: format_score(row.best_score),
            worst_score: format_score(row.worst_score),
            user_count: Some(row.user_count),
        },
        last_tasting_date: row.last_tasting_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CreateTastingRequest {
        CreateTastingRequest {
            bottle_identifier: None,
            wine_name: None,
            wine_type: None,
            wine_vintage: None,
            wine_region: None,
            final_score: 15.0,
            appearance_score: None,
            aroma_score: None,
            taste_score: None,
            finish_score: None,
            notes: None,
        }
    }

    #[test]
    fn test_final_score_accepted_at_boundaries() {
        for score in [0.0, 20.0, 17.5] {
            let request = CreateTastingRequest {
                final_score: score,
                ..base_request()
            };
            assert!(request.validate().is_ok(), "score {score} should pass");
        }
    }

    #[test]
    fn test_final_score_rejected_outside_range() {
        for score in [-0.1, 20.1, 100.0] {
            let request = CreateTastingRequest {
                final_score: score,
                ..base_request()
            };
            assert!(request.validate().is_err(), "score {score} should fail");
        }
    }

    #[test]
    fn test_sub_scores_validated_when_present() {
        let request = CreateTastingRequest {
            appearance_score: Some(6),
            ..base_request()
        };
        assert!(request.validate().is_err());

        let request = CreateTastingRequest {
            appearance_score: Some(5),
            aroma_score: Some(1),
            ..base_request()
        };
        assert!(request.validate().is_ok());
    }
}
