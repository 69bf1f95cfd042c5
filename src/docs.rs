use classcue_core::{PaginationMeta, PaginationParams};
use classcue_models::attendance::{
    AttendanceRecord, AttendanceSessionFilterParams, AttendanceSessionResponse,
    CreateAttendanceSessionDto, MarkAttendanceDto, PaginatedAttendanceSessionsResponse,
    QrCodeResponse, SessionAttendanceEntry, SessionAttendanceResponse, StudentAttendanceEntry,
};
use classcue_models::auth::{
    LoginRequest, LoginResponse, RefreshTokenRequest, RegisterStudentDto, RegisterTeacherDto,
    TokenPairResponse,
};
use classcue_models::profiles::{
    ProfileResponse, StudentProfile, TeacherProfile, TeacherProfileWithSubjects, UpdateProfileDto,
};
use classcue_models::subjects::{Subject, SubjectFilterParams};
use classcue_models::{
    AttendanceRecordId, AttendanceSessionId, Email, EnrollmentNumber, SubjectId, UserId,
    UserResponse, UserRole,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_student,
        crate::modules::auth::controller::register_teacher,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh_token,
        crate::modules::profile::controller::get_profile,
        crate::modules::profile::controller::update_profile,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::get_subject_by_id,
        crate::modules::attendance::controller::create_session,
        crate::modules::attendance::controller::list_sessions,
        crate::modules::attendance::controller::get_session,
        crate::modules::attendance::controller::get_qr_code,
        crate::modules::attendance::controller::get_session_attendance,
        crate::modules::attendance::controller::end_session,
        crate::modules::attendance::controller::mark_attendance,
        crate::modules::attendance::controller::get_my_records,
    ),
    components(
        schemas(
            UserId,
            SubjectId,
            AttendanceSessionId,
            AttendanceRecordId,
            Email,
            EnrollmentNumber,
            UserRole,
            UserResponse,
            RegisterStudentDto,
            RegisterTeacherDto,
            LoginRequest,
            LoginResponse,
            RefreshTokenRequest,
            TokenPairResponse,
            StudentProfile,
            TeacherProfile,
            TeacherProfileWithSubjects,
            ProfileResponse,
            UpdateProfileDto,
            Subject,
            SubjectFilterParams,
            CreateAttendanceSessionDto,
            AttendanceSessionFilterParams,
            AttendanceSessionResponse,
            PaginatedAttendanceSessionsResponse,
            QrCodeResponse,
            MarkAttendanceDto,
            AttendanceRecord,
            SessionAttendanceEntry,
            SessionAttendanceResponse,
            StudentAttendanceEntry,
            PaginationMeta,
            PaginationParams,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token refresh"),
        (name = "Profile", description = "The caller's own account and profile"),
        (name = "Subjects", description = "Subject catalog"),
        (name = "Attendance", description = "Attendance sessions, rotating QR codes and attendance records")
    ),
    info(
        title = "ClassCue API",
        version = "0.1.0",
        description = "Classroom attendance tracking with rotating QR codes, built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for path in [
            "/api/auth/register/student",
            "/api/auth/register/teacher",
            "/api/auth/login",
            "/api/auth/refresh",
            "/api/profile",
            "/api/subjects",
            "/api/subjects/{id}",
            "/api/attendance/sessions",
            "/api/attendance/sessions/{id}",
            "/api/attendance/sessions/{id}/qr",
            "/api/attendance/sessions/{id}/attendance",
            "/api/attendance/sessions/{id}/end",
            "/api/attendance/mark",
            "/api/attendance/records",
        ] {
            assert!(paths.contains(&path), "{path} missing from OpenAPI document");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
