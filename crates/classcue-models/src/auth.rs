//! Registration, login and token refresh payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::SubjectId;
use crate::users::{UserResponse, UserRole};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterStudentDto {
    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 200, message = "full_name must be 1-200 characters"))]
    pub full_name: String,
    #[validate(length(min = 1, max = 20, message = "enrollment_number must be 1-20 characters"))]
    #[schema(example = "CS2024001")]
    pub enrollment_number: String,
    #[validate(length(min = 1, max = 100, message = "department must be 1-100 characters"))]
    pub department: String,
    #[validate(range(min = 1, max = 12, message = "semester must be between 1 and 12"))]
    pub semester: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterTeacherDto {
    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "grace@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 200, message = "full_name must be 1-200 characters"))]
    pub full_name: String,
    #[validate(length(min = 1, max = 100, message = "department must be 1-100 characters"))]
    pub department: String,
    /// Subjects this teacher teaches
    #[serde(default)]
    pub subject_ids: Vec<SubjectId>,
}

/// Role-aware login. Students identify with their enrollment number,
/// teachers and admins with their email. `email` is accepted as an alias
/// for `identifier`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(alias = "email")]
    #[validate(length(min = 1, message = "identifier is required"))]
    #[schema(example = "CS2024001")]
    pub identifier: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "password123")]
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> RegisterStudentDto {
        RegisterStudentDto {
            email: "ada@example.com".into(),
            password: "password123".into(),
            full_name: "Ada Lovelace".into(),
            enrollment_number: "CS2024001".into(),
            department: "Computer Science".into(),
            semester: 3,
        }
    }

    #[test]
    fn student_registration_validation() {
        assert!(student().validate().is_ok());

        let short_password = RegisterStudentDto {
            password: "short".into(),
            ..student()
        };
        assert!(short_password.validate().is_err());

        let bad_semester = RegisterStudentDto {
            semester: 0,
            ..student()
        };
        assert!(bad_semester.validate().is_err());

        let bad_email = RegisterStudentDto {
            email: "ada".into(),
            ..student()
        };
        let errors = bad_email.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn teacher_subjects_default_to_empty() {
        let json = r#"{"email":"g@example.com","password":"password123","full_name":"Grace","department":"CS"}"#;
        let dto: RegisterTeacherDto = serde_json::from_str(json).unwrap();
        assert!(dto.subject_ids.is_empty());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn login_accepts_email_alias() {
        let json = r#"{"email":"g@example.com","password":"pw","role":"teacher"}"#;
        let req: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.identifier, "g@example.com");
        assert_eq!(req.role, UserRole::Teacher);
    }

    #[test]
    fn login_requires_known_role() {
        let json = r#"{"identifier":"x","password":"pw","role":"janitor"}"#;
        assert!(serde_json::from_str::<LoginRequest>(json).is_err());
    }
}
