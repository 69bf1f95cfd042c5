//! Attendance session and record models.
//!
//! An attendance session is a teacher-initiated window for one subject.
//! While it is active the teacher's screen shows a QR code whose payload
//! rotates every few seconds; students scan it to create an
//! [`AttendanceRecord`]. At most one record exists per (session, student).

use chrono::{DateTime, Utc};
use classcue_core::serde::deserialize_optional_bool;
use classcue_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{AttendanceRecordId, AttendanceSessionId, SubjectId, UserId};
use crate::value_types::EnrollmentNumber;

/// An `attendance_sessions` row.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceSession {
    pub id: AttendanceSessionId,
    pub teacher_id: UserId,
    pub subject_id: SubjectId,
    pub session_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: bool,
    /// Token currently shown on the teacher's screen
    pub current_qr_code: Option<String>,
    /// Instant after which `current_qr_code` is no longer accepted
    pub qr_expires_at: Option<DateTime<Utc>>,
}

/// Session as returned by the API, joined with its subject and attendance count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceSessionResponse {
    pub id: AttendanceSessionId,
    pub teacher_id: UserId,
    pub subject_id: SubjectId,
    #[schema(example = "CS101")]
    pub subject_code: String,
    #[schema(example = "Programming Fundamentals")]
    pub subject_name: String,
    #[schema(example = "Lecture 5: Ownership")]
    pub session_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: bool,
    /// Number of students marked present so far
    pub total_attended: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAttendanceSessionDto {
    #[validate(length(min = 1, max = 200, message = "session_name must be 1-200 characters"))]
    pub session_name: String,
    pub subject_id: SubjectId,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct AttendanceSessionFilterParams {
    /// Filter by active status
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedAttendanceSessionsResponse {
    pub data: Vec<AttendanceSessionResponse>,
    pub meta: PaginationMeta,
}

/// The current token for a session, ready to be displayed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QrCodeResponse {
    pub session_id: AttendanceSessionId,
    /// Raw token: `{session_id}|{nonce}|{unix_timestamp}`
    pub qr_code: String,
    /// SVG rendering of `qr_code` as a `data:` URL
    pub qr_image: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MarkAttendanceDto {
    /// The scanned token
    #[validate(length(min = 1, max = 500, message = "qr_code must be 1-500 characters"))]
    pub qr_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: AttendanceRecordId,
    pub session_id: AttendanceSessionId,
    pub student_enrollment_number: EnrollmentNumber,
    /// Token the student presented
    pub qr_code_used: String,
    pub marked_at: DateTime<Utc>,
    pub is_valid: bool,
}

/// One line of a session's attendance sheet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SessionAttendanceEntry {
    pub id: AttendanceRecordId,
    pub student_enrollment_number: EnrollmentNumber,
    pub student_name: String,
    pub marked_at: DateTime<Utc>,
    pub is_valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionAttendanceResponse {
    pub session_id: AttendanceSessionId,
    pub session_name: String,
    pub is_active: bool,
    pub total_attended: i64,
    pub attendance_records: Vec<SessionAttendanceEntry>,
}

/// A student's own attendance history entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentAttendanceEntry {
    pub id: AttendanceRecordId,
    pub session_id: AttendanceSessionId,
    pub session_name: String,
    pub subject_code: String,
    pub subject_name: String,
    pub marked_at: DateTime<Utc>,
    pub is_valid: bool,
}
