//! # ClassCue Auth
//!
//! JWT claims and token helpers.
//!
//! - **Access token** ([`Claims`]): short-lived, carries the user id, email
//!   and role so handlers can authorize without a database round trip
//! - **Refresh token** ([`RefreshTokenClaims`]): long-lived, exchanged for a
//!   new token pair
//!
//! ```ignore
//! use classcue_auth::{create_access_token, verify_token};
//!
//! let token = create_access_token(user_id, "t@example.com", "teacher", &jwt_config)?;
//! let claims = verify_token(&token, &jwt_config)?;
//! assert_eq!(claims.role, "teacher");
//! ```

pub mod claims;
pub mod jwt;

pub use claims::{Claims, RefreshTokenClaims};
pub use jwt::{create_access_token, create_refresh_token, verify_refresh_token, verify_token};
