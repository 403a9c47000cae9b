//! Handlers for `/auth`: login, invitation redemption, and the current
//! principal.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use atelier_core::error::CoreError;
use atelier_db::models::profile::Profile;
use atelier_db::repositories::ProfileRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub profile: Profile,
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let profile = ProfileRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    // A profile with no password hash is a pending invitation.
    let hash = profile
        .password_hash
        .as_deref()
        .ok_or_else(invalid_credentials)?;

    let ok = verify_password(&input.password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !ok {
        return Err(invalid_credentials());
    }

    let access_token = generate_access_token(profile.id, &profile.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = profile.id, role = %profile.role, "Login succeeded");

    Ok(Json(DataResponse {
        data: LoginResponse {
            access_token,
            profile,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct ActivateRequest {
    pub invite_token: String,
    pub password: String,
}

/// POST /api/v1/auth/activate
///
/// Redeem an invitation token and set the account password. The token is
/// single-use; it is cleared by the same update that stores the hash.
pub async fn activate(
    State(state): State<AppState>,
    Json(input): Json<ActivateRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let profile = ProfileRepo::activate(&state.pool, &input.invite_token, &hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Invalid or already used invitation token".into(),
            ))
        })?;

    let access_token = generate_access_token(profile.id, &profile.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = profile.id, "Invitation redeemed");

    Ok(Json(DataResponse {
        data: LoginResponse {
            access_token,
            profile,
        },
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = ProfileRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        }))?;
    Ok(Json(DataResponse { data: profile }))
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}
