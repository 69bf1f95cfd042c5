use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_session, end_session, get_my_records, get_qr_code, get_session,
    get_session_attendance, list_sessions, mark_attendance,
};

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session).get(list_sessions))
        .route("/sessions/{id}", get(get_session))
        .route("/sessions/{id}/qr", get(get_qr_code))
        .route("/sessions/{id}/attendance", get(get_session_attendance))
        .route("/sessions/{id}/end", post(end_session))
        .route("/mark", post(mark_attendance))
        .route("/records", get(get_my_records))
}
