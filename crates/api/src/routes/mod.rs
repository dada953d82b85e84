//! Route definitions, grouped by resource.

pub mod auth;
pub mod health;
pub mod sessions;
pub mod tastings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /health                              liveness + db check (public)
///
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/forgot-password                request reset token (public)
/// /auth/reset-password                 consume reset token (public)
/// /auth/setup-password                 invited-participant first login (public)
/// /auth/profile                        profile + statistics
/// /auth/admin/users                    list, invite (arbiter)
/// /auth/admin/users/{id}               delete (arbiter)
/// /auth/admin/reset-all-data           wipe everything (arbiter)
///
/// /sessions/available                  joinable sessions
/// /sessions/{sessionId}/join           idempotent join
/// /sessions/{sessionId}/taster         participant session view
/// /sessions                            create (arbiter)
/// /sessions/admin/all                  list with counts (arbiter)
/// /sessions/{sessionId}                get, delete (arbiter)
/// /sessions/{sessionId}/status         PATCH lifecycle status (arbiter)
/// /sessions/{sessionId}/bottles        add bottle (arbiter)
/// /sessions/bottles/{bottleId}         remove bottle (arbiter)
/// /sessions/{sessionId}/participants   enroll participant (arbiter)
///
/// /tastings                            create, list own
/// /tastings/statistics                 own statistics
/// /tastings/global-statistics          community overview
/// /tastings/rankings                   own bottle leaderboard
/// /tastings/{id}                       get, delete own
/// /tastings/admin/all                  all tastings (arbiter)
/// /tastings/admin/detailed-statistics  global stats + top users (arbiter)
/// /tastings/admin/rankings             global bottle leaderboard (arbiter)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/auth", auth::router())
        .nest("/sessions", sessions::router())
        .nest("/tastings", tastings::router())
}
