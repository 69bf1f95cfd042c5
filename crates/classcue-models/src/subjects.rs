use chrono::{DateTime, Utc};
use classcue_core::serde::deserialize_optional_i32;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::ids::SubjectId;

/// A subject in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: SubjectId,
    /// Unique course code, e.g. `CS101`
    #[schema(example = "CS101")]
    pub subject_code: String,
    #[schema(example = "Programming Fundamentals")]
    pub name: String,
    pub semester: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct SubjectFilterParams {
    /// Only subjects taught in this semester
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub semester: Option<i32>,
}
