mod common;

use axum::http::StatusCode;
use common::{send, setup_test_app, subject_id};
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_list_subjects_is_public(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(&app, "GET", "/api/subjects", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let subjects = body.as_array().unwrap();
    assert_eq!(subjects.len(), 4);
    assert_eq!(subjects[0]["subject_code"], "CS101");
    assert_eq!(subjects[0]["name"], "Programming Fundamentals");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_filter_by_semester(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(&app, "GET", "/api/subjects?semester=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let subjects = body.as_array().unwrap();
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0]["subject_code"], "CS102");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_subject(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let id = subject_id(&pool, "CS201").await;

    let (status, body) = send(&app, "GET", &format!("/api/subjects/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Database Management");
    assert_eq!(body["semester"], 3);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/subjects/{}", uuid::Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Subject not found");
}
