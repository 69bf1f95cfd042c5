//! Request extractors and layers for authentication, authorization and rate limiting.
//!
//! - [`auth`]: bearer-token extractor ([`auth::AuthUser`])
//! - [`role`]: role-gated extractors ([`role::RequireTeacher`], [`role::RequireStudent`])
//! - [`rate_limit`]: per-IP limiter for the auth routes

pub mod auth;
pub mod rate_limit;
pub mod role;
