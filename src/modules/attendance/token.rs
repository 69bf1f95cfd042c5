//! Rotating attendance tokens.
//!
//! A token is `{session_id}|{nonce}|{unix_timestamp}`: the owning session, a
//! random v4 UUID, and the second it was issued. Only the most recently issued
//! token of a session is accepted, and only until the session's stored expiry.

use chrono::{DateTime, Duration, Utc};
use classcue_models::AttendanceSessionId;
use classcue_models::attendance::AttendanceSession;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QrTokenError {
    #[error("expected 3 segments, found {0}")]
    SegmentCount(usize),
    #[error("session id is not a UUID")]
    SessionId,
    #[error("nonce is empty")]
    EmptyNonce,
    #[error("timestamp is not an integer")]
    Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrToken {
    pub session_id: AttendanceSessionId,
    pub nonce: String,
    /// Unix seconds at issuance
    pub issued_at: i64,
}

impl QrToken {
    pub fn generate(session_id: AttendanceSessionId, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            nonce: Uuid::new_v4().to_string(),
            issued_at: now.timestamp(),
        }
    }

    /// Instant the stored copy of a token issued at `now` stops being accepted.
    /// Saturates at the latest representable instant.
    pub fn expiry(now: DateTime<Utc>, ttl_seconds: i64) -> DateTime<Utc> {
        Duration::try_seconds(ttl_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Whether the token is past its lifetime judged by its own timestamp.
    pub fn is_stale(&self, ttl_seconds: i64, now: DateTime<Utc>) -> bool {
        self.issued_at.saturating_add(ttl_seconds) <= now.timestamp()
    }
}

impl fmt::Display for QrToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.session_id, self.nonce, self.issued_at
        )
    }
}

impl FromStr for QrToken {
    type Err = QrTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        let &[session_id, nonce, issued_at] = parts.as_slice() else {
            return Err(QrTokenError::SegmentCount(parts.len()));
        };

        let session_id = session_id
            .parse::<AttendanceSessionId>()
            .map_err(|_| QrTokenError::SessionId)?;
        if nonce.is_empty() {
            return Err(QrTokenError::EmptyNonce);
        }
        let issued_at = issued_at
            .parse::<i64>()
            .map_err(|_| QrTokenError::Timestamp)?;

        Ok(Self {
            session_id,
            nonce: nonce.to_string(),
            issued_at,
        })
    }
}

/// Why a well-formed token was refused for its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Inactive,
    Expired,
    Invalid,
}

impl TokenRejection {
    pub fn message(self) -> &'static str {
        match self {
            Self::Inactive => "Session is no longer active",
            Self::Expired => "QR code has expired",
            Self::Invalid => "Invalid QR code",
        }
    }

    /// Metric label.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Expired => "expired",
            Self::Invalid => "invalid",
        }
    }
}

/// Decides whether `presented` may be used against `session` at `now`.
///
/// Checks run in order: session closed, current token past its stored expiry,
/// superseded token past its own lifetime, anything else that does not match.
pub fn check_token(
    session: &AttendanceSession,
    presented: &str,
    token: &QrToken,
    ttl_seconds: i64,
    now: DateTime<Utc>,
) -> Result<(), TokenRejection> {
    if !session.is_active {
        return Err(TokenRejection::Inactive);
    }

    if session.current_qr_code.as_deref() == Some(presented) {
        return match session.qr_expires_at {
            Some(expires_at) if now < expires_at => Ok(()),
            _ => Err(TokenRejection::Expired),
        };
    }

    if token.session_id == session.id && token.is_stale(ttl_seconds, now) {
        return Err(TokenRejection::Expired);
    }

    Err(TokenRejection::Invalid)
}
