use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use classcue_auth::{Claims, verify_token};
use classcue_core::AppError;
use classcue_models::{UserId, UserRole};

use crate::state::AppState;

/// Extractor that validates the bearer token and provides its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    pub fn role(&self) -> Result<UserRole, AppError> {
        self.0
            .role
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid role in token".to_string()))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format".to_string()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = verify_token(token, &state.jwt_config)?;
        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn claims(sub: &str, role: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: "test@example.com".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_user_id_parses_subject() {
        let id = UserId::new();
        let user = AuthUser(claims(&id.to_string(), "teacher"));
        assert_eq!(user.user_id().unwrap(), id);
    }

    #[test]
    fn test_malformed_subject_is_unauthorized() {
        let user = AuthUser(claims("not-a-uuid", "teacher"));
        assert_eq!(user.user_id().unwrap_err().status.as_u16(), 401);
    }

    #[test]
    fn test_role_parses() {
        let user = AuthUser(claims(&UserId::new().to_string(), "student"));
        assert_eq!(user.role().unwrap(), UserRole::Student);

        let user = AuthUser(claims(&UserId::new().to_string(), "janitor"));
        assert!(user.role().is_err());
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(
            bearer_token(&parts_with_header(Some("Bearer abc.def"))).unwrap(),
            "abc.def"
        );
        assert!(bearer_token(&parts_with_header(None)).is_err());
        assert!(bearer_token(&parts_with_header(Some("Basic abc"))).is_err());
        assert!(bearer_token(&parts_with_header(Some("Bearer   "))).is_err());
    }
}
