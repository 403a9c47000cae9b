//! Admin handlers for client provisioning.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atelier_core::error::CoreError;
use atelier_core::roles::ROLE_CLIENT;
use atelier_core::types::DbId;
use atelier_db::models::contact::ClientContact;
use atelier_db::models::profile::Profile;
use atelier_db::repositories::{ContactRepo, ProfileRepo};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Provisioning request for a new client account.
///
/// With a `temp_password` the account is active immediately; without one an
/// invitation token is minted instead and returned so it can be delivered
/// out of band.
#[derive(Debug, Deserialize)]
pub struct ProvisionClient {
    pub email: String,
    pub temp_password: Option<String>,
    pub name: Option<String>,
    pub business_name: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProvisionResponse {
    pub id: DbId,
    /// Only present for invitation-based provisioning.
    pub invite_token: Option<String>,
}

/// POST /api/v1/admin/clients
///
/// Provisioning runs in three steps (identity, profile fields, primary
/// contact) and reports which step failed so a half-provisioned client is
/// diagnosable from the error alone.
pub async fn provision(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ProvisionClient>,
) -> AppResult<(StatusCode, Json<DataResponse<ProvisionResponse>>)> {
    let email = input.email.trim();
    if email.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "email must not be empty".into(),
        )));
    }

    // Step 1: identity. Active account when a usable temp password was
    // given, pending invitation otherwise.
    let (password_hash, invite_token) = match input.temp_password.as_deref() {
        Some(password) => {
            validate_password_strength(password)
                .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
            let hash = hash_password(password)
                .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;
            (Some(hash), None)
        }
        None => (None, Some(Uuid::new_v4().to_string())),
    };

    let profile = ProfileRepo::create_identity(
        &state.pool,
        email,
        ROLE_CLIENT,
        password_hash.as_deref(),
        invite_token.as_deref(),
    )
    .await
    .map_err(|e| match e {
        // Constraint violations (duplicate email) keep their 409 mapping.
        err @ sqlx::Error::Database(_) => AppError::Database(err),
        other => AppError::InternalError(format!("Failed to create client identity: {other}")),
    })?;

    // Step 2: profile fields.
    ProfileRepo::apply_client_fields(
        &state.pool,
        profile.id,
        input.name.as_deref(),
        input.business_name.as_deref(),
        input.position.as_deref(),
        input.phone.as_deref(),
        input.address.as_deref(),
    )
    .await
    .map_err(|e| AppError::InternalError(format!("Failed to save client profile: {e}")))?;

    // Step 3: primary contact.
    ContactRepo::create(
        &state.pool,
        profile.id,
        input.name.as_deref(),
        input.position.as_deref(),
        Some(email),
        input.phone.as_deref(),
        true,
    )
    .await
    .map_err(|e| AppError::InternalError(format!("Failed to create primary contact: {e}")))?;

    tracing::info!(
        client_id = profile.id,
        admin_id = admin.user_id,
        invited = invite_token.is_some(),
        "Client provisioned",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ProvisionResponse {
                id: profile.id,
                invite_token,
            },
        }),
    ))
}

/// GET /api/v1/admin/clients
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Profile>>>> {
    let clients = ProfileRepo::list_clients(&state.pool).await?;
    Ok(Json(DataResponse { data: clients }))
}

/// A client profile with its contact list, primary contact first.
#[derive(Debug, Serialize)]
pub struct ClientDetail {
    #[serde(flatten)]
    pub profile: Profile,
    pub contacts: Vec<ClientContact>,
}

/// GET /api/v1/admin/clients/{id}
pub async fn get_by_id(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ClientDetail>>> {
    let profile = ProfileRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| p.role == ROLE_CLIENT)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;

    let contacts = ContactRepo::list_for_client(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: ClientDetail { profile, contacts },
    }))
}
