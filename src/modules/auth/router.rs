use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{login, refresh_token, register_student, register_teacher};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register/student", post(register_student))
        .route("/register/teacher", post(register_teacher))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
}
