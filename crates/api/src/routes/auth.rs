//! Route definitions for the `/auth` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register              -> register (public)
/// POST /login                 -> login (public)
/// GET  /profile               -> profile (requires auth)
/// POST /forgot-password       -> request reset token (public)
/// POST /reset-password        -> consume reset token (public)
/// POST /setup-password        -> invited-participant first login (public)
/// GET  /admin/users           -> list participants (arbiter)
/// POST /admin/users           -> invite participant (arbiter)
/// DELETE /admin/users/{id}    -> delete participant (arbiter)
/// DELETE /admin/reset-all-data -> wipe everything (arbiter)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/profile", get(auth::profile))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/setup-password", post(auth::setup_password))
        .route("/admin/users", get(auth::list_users).post(auth::create_user))
        .route("/admin/users/{id}", delete(auth::delete_user))
        .route("/admin/reset-all-data", delete(auth::reset_all_data))
}
