mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use classcue::router::init_router;
use classcue_config::{AttendanceConfig, RateLimitConfig};
use common::test_state;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

/// One request per client, replenished once a minute.
fn strict_rate_limit_config() -> RateLimitConfig {
    RateLimitConfig {
        enabled: true,
        auth_per_second: 60,
        auth_burst_size: 1,
    }
}

fn login_request(ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(
            json!({
                "email": "nobody@example.com",
                "password": "password123",
                "role": "teacher"
            })
            .to_string(),
        ))
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_auth_rate_limit_exceeded(pool: PgPool) {
    let app = init_router(test_state(
        pool,
        strict_rate_limit_config(),
        AttendanceConfig::default(),
    ));

    let response = app.clone().oneshot(login_request("192.168.1.100")).await.unwrap();
    // Processed, just with bad credentials
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.oneshot(login_request("192.168.1.100")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_different_ips_have_separate_limits(pool: PgPool) {
    let app = init_router(test_state(
        pool,
        strict_rate_limit_config(),
        AttendanceConfig::default(),
    ));

    let response = app.clone().oneshot(login_request("10.0.0.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.oneshot(login_request("10.0.0.2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_non_auth_routes_are_not_limited(pool: PgPool) {
    let app = init_router(test_state(
        pool,
        strict_rate_limit_config(),
        AttendanceConfig::default(),
    ));

    for _ in 0..3 {
        let request = Request::builder()
            .uri("/api/subjects")
            .header("x-forwarded-for", "172.16.0.1")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
