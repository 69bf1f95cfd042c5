//! Deserializers for query-string parameters.
//!
//! Query strings arrive as text, and browsers happily send `?semester=` with an
//! empty value. These helpers treat an empty string as `None` and parse
//! everything else.

use serde::{Deserialize, Deserializer};
use std::str::FromStr;

fn parse_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse::<T>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    parse_optional(deserializer)
}

pub fn deserialize_optional_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    parse_optional(deserializer)
}

pub fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    parse_optional(deserializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "deserialize_optional_i32")]
        semester: Option<i32>,
        #[serde(default, deserialize_with = "deserialize_optional_bool")]
        is_active: Option<bool>,
    }

    #[test]
    fn empty_strings_are_none() {
        let f: Filter = serde_json::from_str(r#"{"semester":"","is_active":""}"#).unwrap();
        assert_eq!(f.semester, None);
        assert_eq!(f.is_active, None);
    }

    #[test]
    fn values_are_parsed() {
        let f: Filter = serde_json::from_str(r#"{"semester":"3","is_active":"true"}"#).unwrap();
        assert_eq!(f.semester, Some(3));
        assert_eq!(f.is_active, Some(true));
    }

    #[test]
    fn missing_fields_default_to_none() {
        let f: Filter = serde_json::from_str("{}").unwrap();
        assert_eq!(f.semester, None);
        assert_eq!(f.is_active, None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(serde_json::from_str::<Filter>(r#"{"semester":"three"}"#).is_err());
    }
}
