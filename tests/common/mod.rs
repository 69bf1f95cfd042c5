#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use classcue::router::init_router;
use classcue::state::AppState;
use classcue_config::{AttendanceConfig, CorsConfig, JwtConfig, RateLimitConfig};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "password123";

pub struct TestStudent {
    pub id: Uuid,
    pub email: String,
    pub enrollment_number: String,
}

pub struct TestTeacher {
    pub id: Uuid,
    pub email: String,
}

pub fn test_state(
    pool: PgPool,
    rate_limit_config: RateLimitConfig,
    attendance_config: AttendanceConfig,
) -> AppState {
    dotenvy::dotenv().ok();
    AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config,
        attendance_config,
    }
}

pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_state(
        pool,
        RateLimitConfig::disabled(),
        AttendanceConfig::default(),
    ))
}

pub fn setup_test_app_with_ttl(pool: PgPool, qr_token_ttl_seconds: i64) -> Router {
    init_router(test_state(
        pool,
        RateLimitConfig::disabled(),
        AttendanceConfig {
            qr_token_ttl_seconds,
        },
    ))
}

/// Sends one request and returns the status with the JSON body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let body = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub fn unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Short enough for the 20 character column.
pub fn unique_enrollment_number() -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("EN{}", &simple[..12]).to_uppercase()
}

pub async fn subject_id(pool: &PgPool, code: &str) -> Uuid {
    sqlx::query_scalar("SELECT id FROM subjects WHERE subject_code = $1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn register_student(app: &Router) -> TestStudent {
    let email = unique_email();
    let enrollment_number = unique_enrollment_number();
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register/student",
        None,
        Some(json!({
            "email": email,
            "password": PASSWORD,
            "full_name": "Ada Lovelace",
            "enrollment_number": enrollment_number,
            "department": "Computer Science",
            "semester": 3
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    TestStudent {
        id: body["id"].as_str().unwrap().parse().unwrap(),
        email,
        enrollment_number,
    }
}

pub async fn register_teacher(app: &Router, subject_ids: &[Uuid]) -> TestTeacher {
    let email = unique_email();
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register/teacher",
        None,
        Some(json!({
            "email": email,
            "password": PASSWORD,
            "full_name": "Grace Hopper",
            "department": "Computer Science",
            "subject_ids": subject_ids
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    TestTeacher {
        id: body["id"].as_str().unwrap().parse().unwrap(),
        email,
    }
}

/// Logs in and returns the access token.
pub async fn login(app: &Router, identifier: &str, role: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({
            "identifier": identifier,
            "password": PASSWORD,
            "role": role
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["access_token"].as_str().unwrap().to_string()
}

pub async fn student_token(app: &Router) -> (TestStudent, String) {
    let student = register_student(app).await;
    let token = login(app, &student.enrollment_number, "student").await;
    (student, token)
}

pub async fn teacher_token(app: &Router) -> (TestTeacher, String) {
    let teacher = register_teacher(app, &[]).await;
    let token = login(app, &teacher.email, "teacher").await;
    (teacher, token)
}
