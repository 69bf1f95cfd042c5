//! # ClassCue Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: JWT signing secret and token lifetimes
//! - [`cors`]: allowed browser origins
//! - [`rate_limit`]: auth endpoint rate limiting
//! - [`attendance`]: QR token rotation settings
//!
//! Every type has a `from_env()` constructor that falls back to development
//! defaults when a variable is unset or unparsable.
//!
//! ```ignore
//! use classcue_config::{AttendanceConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let attendance_config = AttendanceConfig::from_env();
//! ```

pub mod attendance;
pub mod cors;
pub mod jwt;
pub mod rate_limit;

pub use attendance::AttendanceConfig;
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;

/// Reads `key` and parses it, falling back to `default`.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
