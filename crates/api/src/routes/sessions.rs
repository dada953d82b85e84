//! Route definitions for the `/sessions` resource.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// Static segments (`/available`, `/admin/all`, `/bottles/...`) take
/// priority over the `{sessionId}` captures.
///
/// ```text
/// GET    /available                    -> joinable sessions (participant)
/// POST   /{sessionId}/join             -> idempotent join (participant)
/// GET    /{sessionId}/taster           -> participant session view
/// POST   /                             -> create session (arbiter)
/// GET    /admin/all                    -> all sessions with counts (arbiter)
/// GET    /{sessionId}                  -> session detail (arbiter)
/// DELETE /{sessionId}                  -> cascade delete (arbiter)
/// PATCH  /{sessionId}/status           -> lifecycle status (arbiter)
/// POST   /{sessionId}/bottles          -> add bottle (arbiter)
/// DELETE /bottles/{bottleId}           -> remove bottle (arbiter)
/// POST   /{sessionId}/participants     -> enroll participant (arbiter)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/available", get(sessions::available_sessions))
        .route("/{session_id}/join", post(sessions::join_session))
        .route("/{session_id}/taster", get(sessions::taster_view))
        .route("/", post(sessions::create_session))
        .route("/admin/all", get(sessions::list_all_sessions))
        .route(
            "/{session_id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/{session_id}/status", patch(sessions::update_status))
        .route("/{session_id}/bottles", post(sessions::add_bottle))
        .route("/bottles/{bottle_id}", delete(sessions::remove_bottle))
        .route(
            "/{session_id}/participants",
            post(sessions::add_participant),
        )
}
