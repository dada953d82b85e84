//! Route definitions for the `/tastings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tastings;
use crate::state::AppState;

/// Routes mounted at `/tastings`. All require authentication; the
/// `/admin` subtree additionally requires the arbiter role.
///
/// ```text
/// POST   /                             -> record tasting
/// GET    /                             -> own tastings, paginated
/// GET    /statistics                   -> own statistics
/// GET    /global-statistics            -> community overview
/// GET    /rankings                     -> own bottle leaderboard
/// GET    /{id}                         -> one tasting (owner only)
/// DELETE /{id}                         -> delete (owner only)
/// GET    /admin/all                    -> all tastings (arbiter)
/// GET    /admin/detailed-statistics    -> global stats + top users (arbiter)
/// GET    /admin/rankings               -> global bottle leaderboard (arbiter)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(tastings::list_tastings).post(tastings::create_tasting),
        )
        .route("/statistics", get(tastings::user_statistics))
        .route("/global-statistics", get(tastings::global_statistics))
        .route("/rankings", get(tastings::bottle_rankings))
        .route("/admin/all", get(tastings::list_all_tastings))
        .route(
            "/admin/detailed-statistics",
            get(tastings::detailed_statistics),
        )
        .route("/admin/rankings", get(tastings::global_bottle_rankings))
        .route(
            "/{id}",
            get(tastings::get_tasting).delete(tastings::delete_tasting),
        )
}
