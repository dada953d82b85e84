//! Role-based access control (RBAC) extractor.
//!
//! Wraps [`CurrentUser`] and rejects requests whose role does not meet
//! the requirement, enforcing authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cuvee_core::error::CoreError;
use cuvee_core::roles::ROLE_ARBITER;

use super::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `arbiter` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn arbiter_only(RequireArbiter(user): RequireArbiter) -> AppResult<Json<()>> {
///     // user is guaranteed to be an arbiter here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireArbiter(pub CurrentUser);

impl FromRequestParts<AppState> for RequireArbiter {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ARBITER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only arbiters may access this resource".into(),
            )));
        }
        Ok(RequireArbiter(user))
    }
}
