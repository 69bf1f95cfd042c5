//! Role-specific profiles.
//!
//! Every student has exactly one [`StudentProfile`], keyed by enrollment
//! number. Every teacher has one [`TeacherProfile`] plus the subjects they
//! teach. Admins have no profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{SubjectId, UserId};
use crate::subjects::Subject;
use crate::users::UserResponse;
use crate::value_types::EnrollmentNumber;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentProfile {
    pub enrollment_number: EnrollmentNumber,
    pub user_id: UserId,
    pub full_name: String,
    pub department: String,
    pub semester: i32,
    /// Free-form interest tags
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub goals: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TeacherProfile {
    pub user_id: UserId,
    pub full_name: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeacherProfileWithSubjects {
    #[serde(flatten)]
    pub profile: TeacherProfile,
    pub subjects: Vec<Subject>,
}

/// `GET /api/profile` response. Exactly one of the profile fields is set
/// for students and teachers; both are absent for admins.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_profile: Option<StudentProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_profile: Option<TeacherProfileWithSubjects>,
}

/// Partial profile update. Fields that do not apply to the caller's role
/// are rejected by the service.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 200, message = "full_name must be 1-200 characters"))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "department must be 1-100 characters"))]
    pub department: Option<String>,
    /// Students only
    #[validate(range(min = 1, max = 12, message = "semester must be between 1 and 12"))]
    pub semester: Option<i32>,
    /// Students only
    #[validate(length(max = 50, message = "interests may hold at most 50 entries"))]
    pub interests: Option<Vec<String>>,
    /// Students only
    #[validate(length(max = 50, message = "skills may hold at most 50 entries"))]
    pub skills: Option<Vec<String>>,
    /// Students only
    #[validate(length(max = 50, message = "goals may hold at most 50 entries"))]
    pub goals: Option<Vec<String>>,
    /// Teachers only; replaces the taught subject set
    pub subject_ids: Option<Vec<SubjectId>>,
}

impl UpdateProfileDto {
    pub fn touches_student_fields(&self) -> bool {
        self.semester.is_some()
            || self.interests.is_some()
            || self.skills.is_some()
            || self.goals.is_some()
    }
}

/// Trims entries, drops blanks and duplicates while keeping first-seen order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            out.push(tag.to_string());
        }
    }
    out
}
