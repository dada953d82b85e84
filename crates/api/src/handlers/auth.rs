//! Handlers for the `/auth` resource: registration, login, the
//! password flows, and arbiter-only user management.

use std::sync::LazyLock;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use cuvee_core::error::CoreError;
use cuvee_core::roles::{ROLE_ARBITER, ROLE_PARTICIPANT};
use cuvee_core::scoring::format_optional_score;
use cuvee_core::types::{DbId, Timestamp};
use cuvee_db::models::user::{CreateUser, UserResponse};
use cuvee_db::repositories::{MaintenanceRepo, PasswordResetRepo, UserRepo};

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::token::generate_opaque_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireArbiter;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validation::validate_payload;

/// Lifetime of a password reset token.
const RESET_TOKEN_TTL_HOURS: i64 = 24;

/// Neutral response for the forgot-password flow; identical whether or
/// not the account exists.
const RESET_NEUTRAL_MESSAGE: &str = "If this email exists, a reset link has been sent";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z0-9_-]+$").expect("username regex must compile"));

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"),
        regex(
            path = *USERNAME_RE,
            message = "Username may only contain letters, digits, dashes, and underscores"
        )
    )]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = password_rule))]
    pub password: String,
    #[validate(length(max = 100, message = "First name must not exceed 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Last name must not exceed 100 characters"))]
    pub last_name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,
    #[validate(custom(function = password_rule))]
    pub new_password: String,
}

/// Request body for `POST /auth/setup-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct SetupPasswordRequest {
    #[validate(length(min = 1, message = "Setup token is required"))]
    pub token: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = password_rule))]
    pub password: String,
}

/// Request body for `POST /auth/admin/users`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InviteParticipantRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Successful authentication payload returned by register, login, and
/// setup-password.
#[derive(Debug, Serialize)]
pub struct AuthData {
    pub user: UserResponse,
    pub token: String,
}

/// Development-only payload of the forgot-password response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordData {
    pub reset_token: String,
    pub email: String,
}

/// Profile payload with embedded statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
    pub statistics: ProfileStatistics,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStatistics {
    pub total_tastings: i64,
    pub average_score: Option<String>,
    pub best_score: Option<String>,
}

/// One participant in the arbiter's user listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub needs_password_setup: bool,
    pub created_at: Timestamp,
    pub stats: ParticipantStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStats {
    pub tasting_count: i64,
    pub average_score: Option<String>,
}

/// Payload returned when inviting a participant.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationData {
    pub user: UserResponse,
    pub needs_password_setup: bool,
    pub email_sent: bool,
    pub activation_link: String,
}

// ---------------------------------------------------------------------------
// Public handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Self-registration for participants. Returns the new account and a
/// bearer token with 201 Created.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthData>>)> {
    validate_payload(&input)?;

    if UserRepo::find_by_username_or_email(&state.pool, &input.username, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A user with this email or username already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
            role: ROLE_PARTICIPANT.to_string(),
            needs_password_setup: false,
        },
    )
    .await?;

    let token = issue_token(&state, user.id, &user.role)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Account created successfully",
            AuthData {
                user: UserResponse::from(&user),
                token,
            },
        )),
    ))
}

/// POST /api/auth/login
///
/// Authenticate with email + password. The same message is returned
/// for unknown emails and wrong passwords.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthData>>> {
    validate_payload(&input)?;

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Account is deactivated".into(),
        )));
    }

    // Invited accounts hold a setup token in the hash slot; it never
    // parses as a PHC string, so the comparison falls through to false.
    let password_valid = verify_password(&input.password, &user.password_hash).unwrap_or(false);
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    UserRepo::record_login(&state.pool, user.id).await?;
    let token = issue_token(&state, user.id, &user.role)?;

    Ok(Json(ApiResponse::with_message(
        "Login successful",
        AuthData {
            user: UserResponse::from(&user),
            token,
        },
    )))
}

/// GET /api/auth/profile
///
/// The caller's identity with embedded tasting statistics.
pub async fn profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<ProfileData>>> {
    let row = UserRepo::profile(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;

    Ok(Json(ApiResponse::data(ProfileData {
        id: row.id,
        username: row.username,
        email: row.email,
        first_name: row.first_name,
        last_name: row.last_name,
        role: row.role,
        created_at: row.created_at,
        statistics: ProfileStatistics {
            total_tastings: row.total_tastings,
            average_score: format_optional_score(row.average_score),
            best_score: format_optional_score(row.best_score),
        },
    })))
}

/// POST /api/auth/forgot-password
///
/// Issue a fresh reset token, invalidating all prior unused ones.
/// Always answers with the neutral message; in development mode the
/// token is additionally echoed in the body for testing without SMTP.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<ApiResponse<ForgotPasswordData>>> {
    validate_payload(&input)?;

    let user = match UserRepo::find_by_email(&state.pool, &input.email).await? {
        Some(user) if user.is_active => user,
        _ => return Ok(Json(ApiResponse::message(RESET_NEUTRAL_MESSAGE))),
    };

    PasswordResetRepo::invalidate_for_user(&state.pool, user.id).await?;

    let token = generate_opaque_token();
    let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
    PasswordResetRepo::create(&state.pool, user.id, &token, expires_at).await?;

    tracing::info!(user_id = user.id, "Password reset token issued");

    if state.config.is_development() {
        Ok(Json(ApiResponse::with_message(
            RESET_NEUTRAL_MESSAGE,
            ForgotPasswordData {
                reset_token: token,
                email: user.email,
            },
        )))
    } else {
        Ok(Json(ApiResponse::message(RESET_NEUTRAL_MESSAGE)))
    }
}

/// POST /api/auth/reset-password
///
/// Consume an unused, unexpired reset token and set a new password.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate_payload(&input)?;

    let reset = PasswordResetRepo::find_valid(&state.pool, &input.token)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation("Invalid or expired reset token".into()))
        })?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?;

    UserRepo::set_password(&state.pool, reset.user_id, &password_hash, false).await?;
    PasswordResetRepo::mark_used(&state.pool, reset.id).await?;

    tracing::info!(user_id = reset.user_id, "Password reset completed");
    Ok(Json(ApiResponse::message("Password reset successfully")))
}

/// POST /api/auth/setup-password
///
/// First-login flow for invited participants: exchange the setup token
/// from the activation link for a real password and a bearer token.
pub async fn setup_password(
    State(state): State<AppState>,
    Json(input): Json<SetupPasswordRequest>,
) -> AppResult<Json<ApiResponse<AuthData>>> {
    validate_payload(&input)?;

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid setup token or email".into()))
        })?;

    if !user.needs_password_setup {
        return Err(AppError::Core(CoreError::Conflict(
            "Account is already configured".into(),
        )));
    }

    // The invitation stored the setup token in the hash slot.
    if user.password_hash != input.token {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid setup token or email".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?;
    UserRepo::set_password(&state.pool, user.id, &password_hash, true).await?;

    let token = issue_token(&state, user.id, &user.role)?;

    Ok(Json(ApiResponse::with_message(
        "Password configured successfully",
        AuthData {
            user: UserResponse::from(&user),
            token,
        },
    )))
}

// ---------------------------------------------------------------------------
// Arbiter-only handlers
// ---------------------------------------------------------------------------

/// GET /api/auth/admin/users
///
/// All participants with their tasting count and mean score.
pub async fn list_users(
    State(state): State<AppState>,
    RequireArbiter(_arbiter): RequireArbiter,
) -> AppResult<Json<ApiResponse<Vec<ParticipantSummary>>>> {
    let rows = UserRepo::list_participants_with_stats(&state.pool, ROLE_PARTICIPANT).await?;

    let users = rows
        .into_iter()
        .map(|row| ParticipantSummary {
            id: row.id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            role: row.role,
            is_active: row.is_active,
            needs_password_setup: row.needs_password_setup,
            created_at: row.created_at,
            stats: ParticipantStats {
                tasting_count: row.tasting_count,
                average_score: format_optional_score(row.average_score),
            },
        })
        .collect();

    Ok(Json(ApiResponse::data(users)))
}

/// POST /api/auth/admin/users
///
/// Invite a participant: create the account with a setup token in
/// place of a password and send (or log) the activation link.
pub async fn create_user(
    State(state): State<AppState>,
    RequireArbiter(_arbiter): RequireArbiter,
    Json(input): Json<InviteParticipantRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<InvitationData>>)> {
    validate_payload(&input)?;

    if UserRepo::find_by_email(&state.pool, &input.email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "A user with this email already exists".into(),
        )));
    }

    let setup_token = generate_opaque_token();
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: derive_username(&input.email),
            email: input.email,
            password_hash: setup_token.clone(),
            first_name: Some(input.first_name.clone()),
            last_name: None,
            role: ROLE_PARTICIPANT.to_string(),
            needs_password_setup: true,
        },
    )
    .await?;

    let activation_link = format!(
        "{}/?token={}&email={}",
        state.config.frontend_url,
        setup_token,
        urlencoding::encode(&user.email)
    );

    let email_sent = match &state.mailer {
        Some(mailer) => {
            match mailer
                .send_participant_invitation(&user.email, &input.first_name, &activation_link)
                .await
            {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to send invitation email");
                    false
                }
            }
        }
        None => {
            tracing::info!(link = %activation_link, "SMTP not configured; activation link logged");
            false
        }
    };

    let message = if email_sent {
        "Participant created successfully; invitation email sent"
    } else {
        "Participant created successfully; invitation email not sent"
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            message,
            InvitationData {
                user: UserResponse::from(&user),
                needs_password_setup: true,
                email_sent,
                activation_link,
            },
        )),
    ))
}

/// DELETE /api/auth/admin/users/{id}
///
/// Delete a participant and everything they own. Arbiter accounts can
/// never be deleted through this endpoint.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireArbiter(_arbiter): RequireArbiter,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    if user.role == ROLE_ARBITER {
        return Err(AppError::Core(CoreError::Forbidden(
            "Arbiter accounts cannot be deleted".into(),
        )));
    }

    UserRepo::delete_cascade(&state.pool, id).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

/// DELETE /api/auth/admin/reset-all-data
///
/// Wipe all tasting data and every non-arbiter account.
pub async fn reset_all_data(
    State(state): State<AppState>,
    RequireArbiter(_arbiter): RequireArbiter,
) -> AppResult<Json<ApiResponse<()>>> {
    MaintenanceRepo::reset_all_data(&state.pool, ROLE_ARBITER).await?;
    Ok(Json(ApiResponse::message("All data deleted successfully")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate a bearer token, mapping failures to 500.
fn issue_token(state: &AppState, user_id: DbId, role: &str) -> AppResult<String> {
    generate_token(user_id, role, &state.config.jwt)
        .map_err(|e| AppError::Internal(format!("Token generation error: {e}")))
}

/// Validator-compatible wrapper around the password strength rules.
fn password_rule(password: &str) -> Result<(), ValidationError> {
    validate_password_strength(password).map_err(|msg| {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(msg.into());
        err
    })
}

/// Derive a username from the email local part: lowercased, letters
/// and digits only.
fn derive_username(email: &str) -> String {
    email
        .split('@')
        .next()
        .unwrap_or_default()
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_username_strips_punctuation() {
        assert_eq!(derive_username("Jean.Dupont+wine@example.com"), "jeandupontwine");
        assert_eq!(derive_username("alice@example.com"), "alice");
    }

    #[test]
    fn test_register_request_rules() {
        let valid = RegisterRequest {
            username: "alice_b".to_string(),
            email: "alice@example.com".to_string(),
            password: "Abcdef12".to_string(),
            first_name: None,
            last_name: None,
        };
        assert!(valid.validate().is_ok());

        let bad_username = RegisterRequest {
            username: "a!".to_string(),
            ..rebuild(&valid)
        };
        assert!(bad_username.validate().is_err());

        let weak_password = RegisterRequest {
            password: "weakpass".to_string(),
            ..rebuild(&valid)
        };
        assert!(weak_password.validate().is_err());
    }

    /// Clone helper; `RegisterRequest` intentionally has no `Clone`.
    fn rebuild(r: &RegisterRequest) -> RegisterRequest {
        RegisterRequest {
            username: r.username.clone(),
            email: r.email.clone(),
            password: r.password.clone(),
            first_name: r.first_name.clone(),
            last_name: r.last_name.clone(),
        }
    }
}
