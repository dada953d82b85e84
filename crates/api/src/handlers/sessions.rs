//! Handlers for the `/sessions` resource: session lifecycle, bottle
//! registration, and participant enrollment.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use cuvee_core::error::CoreError;
use cuvee_core::roles::ROLE_PARTICIPANT;
use cuvee_core::session::{validate_session_name, SessionStatus, SessionType, STATUS_ACTIVE};
use cuvee_core::types::DbId;
use cuvee_db::models::bottle::{Bottle, CreateBottle};
use cuvee_db::models::enrollment::{Enrollment, EnrollmentWithUser};
use cuvee_db::models::tasting_session::{CreateSession, SessionOverview, TastingSession};
use cuvee_db::repositories::{BottleRepo, EnrollmentRepo, SessionRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireArbiter;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validation::validate_payload;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /sessions`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Session name is required and must not exceed 200 characters"
    ))]
    pub name: String,
    /// Defaults to `standard` when omitted.
    #[serde(rename = "type", default)]
    pub session_type: Option<String>,
}

/// Request body for `PATCH /sessions/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Request body for `POST /sessions/{sessionId}/bottles`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddBottleRequest {
    #[validate(range(min = 1, message = "Bottle number must be at least 1"))]
    pub bottle_number: i32,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Custom name is required and must not exceed 100 characters"
    ))]
    pub custom_name: String,
    #[validate(length(max = 1000, message = "Wine details must not exceed 1000 characters"))]
    pub wine_details: Option<String>,
}

/// Request body for `POST /sessions/{sessionId}/participants`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddParticipantRequest {
    pub user_id: DbId,
}

/// Arbiter view of one session: the row plus its bottles and
/// enrollments.
#[derive(Debug, Serialize)]
pub struct SessionDetail {
    pub session: TastingSession,
    pub bottles: Vec<Bottle>,
    pub participants: Vec<EnrollmentWithUser>,
}

/// Join result; `already_joined` distinguishes the idempotent re-join.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinData {
    pub user_session: Enrollment,
    pub already_joined: bool,
}

/// Participant view of a session: the row, its bottles in tasting
/// order, and the caller's own enrollment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TasterView {
    pub session: TastingSession,
    pub bottles: Vec<Bottle>,
    pub user_session: Enrollment,
}

// ---------------------------------------------------------------------------
// Arbiter handlers
// ---------------------------------------------------------------------------

/// POST /api/sessions
///
/// Create a session in `setup` state. Returns 201 Created.
pub async fn create_session(
    State(state): State<AppState>,
    RequireArbiter(arbiter): RequireArbiter,
    Json(input): Json<CreateSessionRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<TastingSession>>)> {
    validate_payload(&input)?;
    validate_session_name(&input.name)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let session_type = match input.session_type.as_deref() {
        Some(value) => SessionType::from_str_value(value)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?,
        None => SessionType::Standard,
    };

    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            name: input.name,
            session_type: session_type.as_str().to_string(),
            created_by: arbiter.user_id,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Session created successfully",
            session,
        )),
    ))
}

/// GET /api/sessions/admin/all
///
/// Every session, newest first, with bottle/participant counts.
pub async fn list_all_sessions(
    State(state): State<AppState>,
    RequireArbiter(_arbiter): RequireArbiter,
) -> AppResult<Json<ApiResponse<Vec<SessionOverview>>>> {
    let sessions = SessionRepo::list_all(&state.pool).await?;
    Ok(Json(ApiResponse::data(sessions)))
}

/// GET /api/sessions/{sessionId}
///
/// One session with its bottles (by number) and enrolled participants.
pub async fn get_session(
    State(state): State<AppState>,
    RequireArbiter(_arbiter): RequireArbiter,
    Path(session_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<SessionDetail>>> {
    let session = SessionRepo::find_by_id(&state.pool, session_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        }))?;

    let bottles = BottleRepo::list_for_session(&state.pool, session_id).await?;
    let participants = EnrollmentRepo::list_for_session(&state.pool, session_id).await?;

    Ok(Json(ApiResponse::data(SessionDetail {
        session,
        bottles,
        participants,
    })))
}

/// PATCH /api/sessions/{sessionId}/status
///
/// Change a session's lifecycle status. Activation demotes every other
/// active session inside the same transaction.
pub async fn update_status(
    State(state): State<AppState>,
    RequireArbiter(_arbiter): RequireArbiter,
    Path(session_id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let status = SessionStatus::from_str_value(&input.status)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let updated = match status {
        SessionStatus::Active => SessionRepo::activate(&state.pool, session_id).await?,
        other => SessionRepo::set_status(&state.pool, session_id, other.as_str()).await?,
    };

    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        }));
    }

    tracing::info!(session_id, status = %input.status, "Session status updated");
    Ok(Json(ApiResponse::message("Session status updated")))
}

/// POST /api/sessions/{sessionId}/bottles
///
/// Register a bottle. The number must be free within the session; the
/// check is a read before the insert, so a concurrent duplicate add
/// can slip through (known gap).
pub async fn add_bottle(
    State(state): State<AppState>,
    RequireArbiter(_arbiter): RequireArbiter,
    Path(session_id): Path<DbId>,
    Json(input): Json<AddBottleRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Bottle>>)> {
    validate_payload(&input)?;

    if SessionRepo::find_by_id(&state.pool, session_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        }));
    }

    if BottleRepo::number_exists(&state.pool, session_id, input.bottle_number).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A bottle with this number already exists in this session".into(),
        )));
    }

    let bottle = BottleRepo::create(
        &state.pool,
        &CreateBottle {
            session_id,
            bottle_number: input.bottle_number,
            custom_name: Some(input.custom_name),
            wine_details: input.wine_details,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Bottle added successfully", bottle)),
    ))
}

/// DELETE /api/sessions/bottles/{bottleId}
pub async fn remove_bottle(
    State(state): State<AppState>,
    RequireArbiter(_arbiter): RequireArbiter,
    Path(bottle_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !BottleRepo::delete(&state.pool, bottle_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Bottle",
            id: bottle_id,
        }));
    }
    Ok(Json(ApiResponse::message("Bottle removed successfully")))
}

/// POST /api/sessions/{sessionId}/participants
///
/// Manually enroll a participant (arbiter-driven variant of join).
pub async fn add_participant(
    State(state): State<AppState>,
    RequireArbiter(_arbiter): RequireArbiter,
    Path(session_id): Path<DbId>,
    Json(input): Json<AddParticipantRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Enrollment>>)> {
    if SessionRepo::find_by_id(&state.pool, session_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        }));
    }

    let participant = UserRepo::find_by_id(&state.pool, input.user_id).await?;
    if !participant.is_some_and(|user| user.role == ROLE_PARTICIPANT) {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Participant",
            id: input.user_id,
        }));
    }

    if EnrollmentRepo::find(&state.pool, input.user_id, session_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "The participant is already enrolled in this session".into(),
        )));
    }

    let enrollment = EnrollmentRepo::create(&state.pool, input.user_id, session_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Participant added to session",
            enrollment,
        )),
    ))
}

/// DELETE /api/sessions/{sessionId}
///
/// Delete a session with its bottles and enrollments. Tastings are
/// never touched.
pub async fn delete_session(
    State(state): State<AppState>,
    RequireArbiter(_arbiter): RequireArbiter,
    Path(session_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !SessionRepo::delete_cascade(&state.pool, session_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        }));
    }
    tracing::info!(session_id, "Session deleted");
    Ok(Json(ApiResponse::message("Session deleted successfully")))
}

// ---------------------------------------------------------------------------
// Participant handlers
// ---------------------------------------------------------------------------

/// GET /api/sessions/available
///
/// Sessions currently open for joining (status `active`).
pub async fn available_sessions(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<SessionOverview>>>> {
    let sessions = SessionRepo::list_active(&state.pool).await?;
    Ok(Json(ApiResponse::data(sessions)))
}

/// POST /api/sessions/{sessionId}/join
///
/// Join an active session. Idempotent: a second join returns the
/// existing enrollment with `alreadyJoined: true` instead of failing.
pub async fn join_session(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<JoinData>>> {
    let session = SessionRepo::find_by_id(&state.pool, session_id).await?;
    if !session.is_some_and(|s| s.status == STATUS_ACTIVE) {
        // Absent and not-active collapse into the same answer.
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Active session",
            id: session_id,
        }));
    }

    if let Some(enrollment) = EnrollmentRepo::find(&state.pool, user.user_id, session_id).await? {
        return Ok(Json(ApiResponse::with_message(
            "Session joined",
            JoinData {
                user_session: enrollment,
                already_joined: true,
            },
        )));
    }

    let enrollment = EnrollmentRepo::create(&state.pool, user.user_id, session_id).await?;

    Ok(Json(ApiResponse::with_message(
        "Session joined successfully",
        JoinData {
            user_session: enrollment,
            already_joined: false,
        },
    )))
}

/// GET /api/sessions/{sessionId}/taster
///
/// The participant view: session, bottles in tasting order, and the
/// caller's enrollment. Requires prior enrollment.
pub async fn taster_view(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<TasterView>>> {
    let session = SessionRepo::find_by_id(&state.pool, session_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        }))?;

    let enrollment = EnrollmentRepo::find(&state.pool, user.user_id, session_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "You are not enrolled in this session".into(),
            ))
        })?;

    let bottles = BottleRepo::list_for_session(&state.pool, session_id).await?;

    Ok(Json(ApiResponse::data(TasterView {
        session,
        bottles,
        user_session: enrollment,
    })))
}
