//! Attendance session settings.

use crate::env_or;

/// Seconds a freshly issued QR token stays valid.
pub const DEFAULT_QR_TOKEN_TTL_SECONDS: i64 = 10;

/// Longest accepted QR token lifetime (one day).
pub const MAX_QR_TOKEN_TTL_SECONDS: i64 = 86_400;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttendanceConfig {
    /// Lifetime of a rotating QR token (`QR_TOKEN_TTL_SECONDS`, default 10)
    pub qr_token_ttl_seconds: i64,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            qr_token_ttl_seconds: DEFAULT_QR_TOKEN_TTL_SECONDS,
        }
    }
}

impl AttendanceConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_ttl(env_or(
            "QR_TOKEN_TTL_SECONDS",
            DEFAULT_QR_TOKEN_TTL_SECONDS,
        ))
    }

    /// Non-positive values fall back to the default, larger ones are capped
    /// at [`MAX_QR_TOKEN_TTL_SECONDS`].
    #[must_use]
    pub fn with_ttl(ttl: i64) -> Self {
        Self {
            qr_token_ttl_seconds: if ttl > 0 {
                ttl.min(MAX_QR_TOKEN_TTL_SECONDS)
            } else {
                DEFAULT_QR_TOKEN_TTL_SECONDS
            },
        }
    }
}
