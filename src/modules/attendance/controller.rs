use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use classcue_core::AppError;
use classcue_models::AttendanceSessionId;
use classcue_models::attendance::{
    AttendanceRecord, AttendanceSessionFilterParams, AttendanceSessionResponse,
    CreateAttendanceSessionDto, MarkAttendanceDto, PaginatedAttendanceSessionsResponse,
    QrCodeResponse, SessionAttendanceResponse, StudentAttendanceEntry,
};
use tracing::instrument;

use super::service::AttendanceService;
use crate::middleware::role::{RequireStudent, RequireTeacher};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Start an attendance session for a subject
#[utoipa::path(
    post,
    path = "/api/attendance/sessions",
    request_body = CreateAttendanceSessionDto,
    responses(
        (status = 201, description = "Session started", body = AttendanceSessionResponse),
        (status = 400, description = "An active session already exists for this subject", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Teachers only", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn create_session(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    ValidatedJson(dto): ValidatedJson<CreateAttendanceSessionDto>,
) -> Result<(StatusCode, Json<AttendanceSessionResponse>), AppError> {
    let teacher_id = auth_user.user_id()?;
    let session = AttendanceService::create_session(&state.db, teacher_id, dto, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// List the caller's sessions, newest first
#[utoipa::path(
    get,
    path = "/api/attendance/sessions",
    params(AttendanceSessionFilterParams),
    responses(
        (status = 200, description = "Sessions", body = PaginatedAttendanceSessionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Teachers only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn list_sessions(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    Query(filters): Query<AttendanceSessionFilterParams>,
) -> Result<Json<PaginatedAttendanceSessionsResponse>, AppError> {
    let teacher_id = auth_user.user_id()?;
    let sessions = AttendanceService::list_sessions(&state.db, teacher_id, filters).await?;
    Ok(Json(sessions))
}

#[utoipa::path(
    get,
    path = "/api/attendance/sessions/{id}",
    params(("id" = AttendanceSessionId, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session details", body = AttendanceSessionResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Teachers only", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    Path(id): Path<AttendanceSessionId>,
) -> Result<Json<AttendanceSessionResponse>, AppError> {
    let teacher_id = auth_user.user_id()?;
    let session = AttendanceService::get_session(&state.db, id, teacher_id).await?;
    Ok(Json(session))
}

/// Current QR token for display, rotated when the previous one has expired
///
/// Clients poll this endpoint while the session is open.
#[utoipa::path(
    get,
    path = "/api/attendance/sessions/{id}/qr",
    params(("id" = AttendanceSessionId, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Current token and its QR rendering", body = QrCodeResponse),
        (status = 400, description = "Session is no longer active", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Teachers only", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_qr_code(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    Path(id): Path<AttendanceSessionId>,
) -> Result<Json<QrCodeResponse>, AppError> {
    let teacher_id = auth_user.user_id()?;
    let qr = AttendanceService::current_qr(
        &state.db,
        id,
        teacher_id,
        state.attendance_config.qr_token_ttl_seconds,
        Utc::now(),
    )
    .await?;
    Ok(Json(qr))
}

#[utoipa::path(
    get,
    path = "/api/attendance/sessions/{id}/attendance",
    params(("id" = AttendanceSessionId, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Students marked present", body = SessionAttendanceResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Teachers only", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_session_attendance(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    Path(id): Path<AttendanceSessionId>,
) -> Result<Json<SessionAttendanceResponse>, AppError> {
    let teacher_id = auth_user.user_id()?;
    let attendance = AttendanceService::session_attendance(&state.db, id, teacher_id).await?;
    Ok(Json(attendance))
}

#[utoipa::path(
    post,
    path = "/api/attendance/sessions/{id}/end",
    params(("id" = AttendanceSessionId, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session ended", body = AttendanceSessionResponse),
        (status = 400, description = "Session has already ended", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Teachers only", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn end_session(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    Path(id): Path<AttendanceSessionId>,
) -> Result<Json<AttendanceSessionResponse>, AppError> {
    let teacher_id = auth_user.user_id()?;
    let session = AttendanceService::end_session(&state.db, id, teacher_id, Utc::now()).await?;
    Ok(Json(session))
}

/// Mark the caller present using a scanned QR token
#[utoipa::path(
    post,
    path = "/api/attendance/mark",
    request_body = MarkAttendanceDto,
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceRecord),
        (status = 400, description = "Malformed, expired or invalid token, inactive session, or already marked", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 404, description = "Session or student profile not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, dto))]
pub async fn mark_attendance(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    ValidatedJson(dto): ValidatedJson<MarkAttendanceDto>,
) -> Result<(StatusCode, Json<AttendanceRecord>), AppError> {
    let student_id = auth_user.user_id()?;
    let record = AttendanceService::mark_attendance(
        &state.db,
        student_id,
        &dto.qr_code,
        state.attendance_config.qr_token_ttl_seconds,
        Utc::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// The caller's attendance history, newest first
#[utoipa::path(
    get,
    path = "/api/attendance/records",
    responses(
        (status = 200, description = "Attendance history", body = Vec<StudentAttendanceEntry>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_my_records(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
) -> Result<Json<Vec<StudentAttendanceEntry>>, AppError> {
    let student_id = auth_user.user_id()?;
    let records = AttendanceService::student_records(&state.db, student_id).await?;
    Ok(Json(records))
}
