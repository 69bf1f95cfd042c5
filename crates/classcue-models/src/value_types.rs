//! Validated domain primitives.
//!
//! Values are normalized on construction so that lookups are stable:
//! emails are trimmed and lowercased, enrollment numbers are trimmed and
//! uppercased. Database reads skip validation because writes always went
//! through [`Email::new`] / [`EnrollmentNumber::new`].

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgTypeInfo, PgValueRef},
};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::ValidateEmail;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueTypeError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
    #[error("Invalid enrollment number: {0}")]
    InvalidEnrollmentNumber(String),
}

/// Implements the text-backed sqlx and serde plumbing shared by both types.
macro_rules! text_value_type {
    ($name:ident) => {
        impl $name {
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValueTypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <String as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <String as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
                Ok(Self(s))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::new(s).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// A validated, lowercased email address.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[schema(value_type = String, format = "email", example = "student@example.com")]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> Result<Self, ValueTypeError> {
        let email = email.into().trim().to_lowercase();
        if email.is_empty() {
            return Err(ValueTypeError::InvalidEmail("email cannot be empty".into()));
        }
        if !email.validate_email() {
            return Err(ValueTypeError::InvalidEmail(format!(
                "'{}' is not a valid email address",
                email
            )));
        }
        Ok(Self(email))
    }
}

text_value_type!(Email);

/// A student's enrollment number: 1-20 ASCII letters, digits, `-` or `/`,
/// stored uppercased.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[schema(value_type = String, example = "CS2024001")]
pub struct EnrollmentNumber(String);

impl EnrollmentNumber {
    pub const MAX_LEN: usize = 20;

    pub fn new(value: impl Into<String>) -> Result<Self, ValueTypeError> {
        let value = value.into().trim().to_uppercase();
        if value.is_empty() {
            return Err(ValueTypeError::InvalidEnrollmentNumber(
                "enrollment number cannot be empty".into(),
            ));
        }
        if value.len() > Self::MAX_LEN {
            return Err(ValueTypeError::InvalidEnrollmentNumber(format!(
                "must be at most {} characters",
                Self::MAX_LEN
            )));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '/')
        {
            return Err(ValueTypeError::InvalidEnrollmentNumber(format!(
                "'{}' contains unsupported characters",
                value
            )));
        }
        Ok(Self(value))
    }

    /// True when `identifier` looks like an enrollment number rather than an email.
    pub fn looks_like(identifier: &str) -> bool {
        !identifier.contains('@') && Self::new(identifier).is_ok()
    }
}

text_value_type!(EnrollmentNumber);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        let email = Email::new("  Ada.Lovelace@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ada.lovelace@example.com");
    }

    #[test]
    fn email_rejects_garbage() {
        assert!(matches!(
            Email::new("not-an-email"),
            Err(ValueTypeError::InvalidEmail(_))
        ));
        assert!(Email::new("   ").is_err());
    }

    #[test]
    fn email_deserialize_validates() {
        assert!(serde_json::from_str::<Email>(r#""teacher@example.com""#).is_ok());
        assert!(serde_json::from_str::<Email>(r#""teacher""#).is_err());
    }

    #[test]
    fn enrollment_number_is_uppercased() {
        let n = EnrollmentNumber::new(" cs2024-001 ").unwrap();
        assert_eq!(n.as_str(), "CS2024-001");
        assert_eq!(n.to_string(), "CS2024-001");
    }

    #[test]
    fn enrollment_number_limits() {
        assert!(EnrollmentNumber::new("").is_err());
        assert!(EnrollmentNumber::new("A".repeat(21)).is_err());
        assert!(EnrollmentNumber::new("A".repeat(20)).is_ok());
        assert!(EnrollmentNumber::new("CS 101").is_err());
        assert!(EnrollmentNumber::new("CS|101").is_err());
    }

    #[test]
    fn identifier_detection() {
        assert!(EnrollmentNumber::looks_like("CS2024001"));
        assert!(!EnrollmentNumber::looks_like("student@example.com"));
    }

    #[test]
    fn error_messages() {
        let err = EnrollmentNumber::new("").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid enrollment number: enrollment number cannot be empty"
        );
    }
}
