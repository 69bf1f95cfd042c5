//! Rate limiting for the authentication endpoints.
//!
//! Login and registration are the only unauthenticated write endpoints, so
//! they get a token bucket per client IP. The key is taken from
//! `x-forwarded-for` / `x-real-ip` / `forwarded` when present, falling back
//! to the peer address.
//!
//! # Environment Variables
//!
//! - `RATE_LIMIT_ENABLED`: default `true`
//! - `RATE_LIMIT_AUTH_PER_SECOND`: seconds to replenish one token (default: 10)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: bucket size (default: 5)

use governor::middleware::NoOpMiddleware;
use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::SmartIpKeyExtractor;

use crate::env_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// When false no governor layer is installed.
    pub enabled: bool,
    /// Replenish interval for auth endpoints, in seconds per request.
    pub auth_per_second: u64,
    /// Requests a single client may burst before being limited.
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auth_per_second: 10,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_or("RATE_LIMIT_ENABLED", defaults.enabled),
            auth_per_second: env_or("RATE_LIMIT_AUTH_PER_SECOND", defaults.auth_per_second),
            auth_burst_size: env_or("RATE_LIMIT_AUTH_BURST_SIZE", defaults.auth_burst_size),
        }
    }

    /// Config with limiting switched off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Builds the governor config for the auth routes.
    ///
    /// # Panics
    ///
    /// Never in practice: both values are clamped to at least 1, which is all
    /// the builder checks.
    #[must_use]
    pub fn auth_governor_config(&self) -> GovernorConfig<SmartIpKeyExtractor, NoOpMiddleware> {
        GovernorConfigBuilder::default()
            .per_second(self.auth_per_second.max(1))
            .burst_size(self.auth_burst_size.max(1))
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("Failed to build auth rate limiter config")
    }
}
