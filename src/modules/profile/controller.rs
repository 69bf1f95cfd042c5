use axum::{Json, extract::State};
use classcue_core::AppError;
use classcue_models::profiles::{ProfileResponse, UpdateProfileDto};
use tracing::instrument;

use super::service::ProfileService;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Current user with their role's profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    let profile = ProfileService::get_profile(&state.db, user_id).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    patch,
    path = "/api/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Field not allowed for this role or unknown subject", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
#[instrument(skip(state, dto))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    let role = auth_user.role()?;
    let profile = ProfileService::update_profile(&state.db, user_id, role, dto).await?;
    Ok(Json(profile))
}
