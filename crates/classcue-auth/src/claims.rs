use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Access token claims.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub email: String,
    /// `student`, `teacher` or `admin`
    pub role: String,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Refresh token claims. `jti` keeps two tokens minted in the same second distinct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_round_trip_keeps_role() {
        let claims = Claims {
            sub: "user-id-123".to_string(),
            email: "teacher@example.com".to_string(),
            role: "teacher".to_string(),
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""role":"teacher""#));

        let parsed: Claims = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed.sub, "user-id-123");
        assert_eq!(parsed.exp, 1234567890);
    }

    #[test]
    fn test_refresh_claims_deserialize() {
        let json = r#"{"sub":"u","email":"s@example.com","exp":10,"iat":5,"jti":"abc"}"#;
        let claims: RefreshTokenClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.jti, "abc");
        assert_eq!(claims.email, "s@example.com");
    }
}
