use axum::{Json, extract::State, http::StatusCode};
use classcue_core::AppError;
use classcue_models::UserResponse;
use classcue_models::auth::{
    LoginRequest, LoginResponse, RefreshTokenRequest, RegisterStudentDto, RegisterTeacherDto,
    TokenPairResponse,
};
use tracing::instrument;
use utoipa::ToSchema;

use super::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Body of every error response.
#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Register a student account and profile
#[utoipa::path(
    post,
    path = "/api/auth/register/student",
    request_body = RegisterStudentDto,
    responses(
        (status = 201, description = "Student registered", body = UserResponse),
        (status = 400, description = "Email or enrollment number already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterStudentDto>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = AuthService::register_student(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Register a teacher account and profile
#[utoipa::path(
    post,
    path = "/api/auth/register/teacher",
    request_body = RegisterTeacherDto,
    responses(
        (status = 201, description = "Teacher registered", body = UserResponse),
        (status = 400, description = "Email already registered or unknown subject", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_teacher(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterTeacherDto>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = AuthService::register_teacher(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in and receive an access and refresh token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenPairResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<TokenPairResponse>, AppError> {
    let tokens = AuthService::refresh(&state.db, &dto.refresh_token, &state.jwt_config).await?;
    Ok(Json(tokens))
}
