use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_subject_by_id, get_subjects};

pub fn init_subjects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_subjects))
        .route("/{id}", get(get_subject_by_id))
}
