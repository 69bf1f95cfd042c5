use axum::body::Body;
use axum::http::{HeaderValue, Response, StatusCode, header::CONTENT_TYPE};
use classcue_config::RateLimitConfig;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{GovernorError, GovernorLayer, key_extractor::SmartIpKeyExtractor};

pub type AuthRateLimitLayer = GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, Body>;

/// Per-IP limiter for `/api/auth/*`, or `None` when limiting is switched off.
pub fn auth_rate_limit_layer(config: &RateLimitConfig) -> Option<AuthRateLimitLayer> {
    if !config.enabled {
        return None;
    }
    let governor_conf = Arc::new(config.auth_governor_config());
    Some(GovernorLayer::new(governor_conf).error_handler(rate_limit_error_handler))
}

fn rate_limit_error_handler(error: GovernorError) -> Response<Body> {
    match error {
        GovernorError::TooManyRequests { wait_time, headers } => {
            tracing::warn!(wait_time, "Auth rate limit exceeded");
            let mut response = json_error(
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests. Please try again later.",
            );
            if let Ok(value) = HeaderValue::from_str(&wait_time.to_string()) {
                response.headers_mut().insert("retry-after", value);
            }
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        GovernorError::UnableToExtractKey => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unable to determine client address",
        ),
        GovernorError::Other { code, msg, headers } => {
            let mut response = json_error(code, msg.as_deref().unwrap_or("Rate limit error"));
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
    }
}

/// Same `{"error": ...}` shape as `AppError`.
fn json_error(status: StatusCode, message: &str) -> Response<Body> {
    let body = serde_json::json!({ "error": message });
    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
