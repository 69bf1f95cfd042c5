use axum::{
    Json,
    extract::{Path, Query, State},
};
use classcue_core::AppError;
use classcue_models::SubjectId;
use classcue_models::subjects::{Subject, SubjectFilterParams};
use tracing::instrument;

use super::service::SubjectService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

/// List the subject catalog
#[utoipa::path(
    get,
    path = "/api/subjects",
    params(SubjectFilterParams),
    responses(
        (status = 200, description = "Subjects ordered by semester and code", body = Vec<Subject>)
    ),
    tag = "Subjects"
)]
#[instrument(skip(state))]
pub async fn get_subjects(
    State(state): State<AppState>,
    Query(filters): Query<SubjectFilterParams>,
) -> Result<Json<Vec<Subject>>, AppError> {
    let subjects = SubjectService::list_subjects(&state.db, filters).await?;
    Ok(Json(subjects))
}

#[utoipa::path(
    get,
    path = "/api/subjects/{id}",
    params(("id" = SubjectId, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject details", body = Subject),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    tag = "Subjects"
)]
#[instrument(skip(state))]
pub async fn get_subject_by_id(
    State(state): State<AppState>,
    Path(id): Path<SubjectId>,
) -> Result<Json<Subject>, AppError> {
    let subject = SubjectService::get_subject(&state.db, id).await?;
    Ok(Json(subject))
}
