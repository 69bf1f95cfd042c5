use anyhow::Context;
use chrono::{DateTime, Utc};
use classcue_core::{AppError, PaginationMeta};
use classcue_models::attendance::{
    AttendanceRecord, AttendanceSession, AttendanceSessionFilterParams,
    AttendanceSessionResponse, CreateAttendanceSessionDto, PaginatedAttendanceSessionsResponse,
    QrCodeResponse, SessionAttendanceEntry, SessionAttendanceResponse, StudentAttendanceEntry,
};
use classcue_models::{AttendanceSessionId, EnrollmentNumber, UserId};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use super::token::{QrToken, TokenRejection, check_token};
use crate::metrics;
use crate::utils::qr::svg_data_url;

const SESSION_COLUMNS: &str = "id, teacher_id, subject_id, session_name, start_time, end_time, \
     is_active, current_qr_code, qr_expires_at";

const SESSION_RESPONSE_SELECT: &str = r#"
    SELECT s.id, s.teacher_id, s.subject_id, sub.subject_code, sub.name AS subject_name,
           s.session_name, s.start_time, s.end_time, s.is_active,
           (SELECT COUNT(*) FROM attendance_records r WHERE r.session_id = s.id) AS total_attended
    FROM attendance_sessions s
    JOIN subjects sub ON sub.id = s.subject_id
"#;

fn session_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Session not found"))
}

fn reject(rejection: TokenRejection) -> AppError {
    metrics::track_attendance_rejected(rejection.reason());
    AppError::bad_request(anyhow::anyhow!(rejection.message()))
}

pub struct AttendanceService;

impl AttendanceService {
    #[instrument(skip(db, dto), fields(subject_id = %dto.subject_id))]
    pub async fn create_session(
        db: &PgPool,
        teacher_id: UserId,
        dto: CreateAttendanceSessionDto,
        now: DateTime<Utc>,
    ) -> Result<AttendanceSessionResponse, AppError> {
        let session_id: AttendanceSessionId = sqlx::query_scalar(
            r#"
            INSERT INTO attendance_sessions (teacher_id, subject_id, session_name, start_time)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(teacher_id)
        .bind(dto.subject_id)
        .bind(dto.session_name.trim())
        .bind(now)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "An active session already exists for this subject"
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::not_found(anyhow::anyhow!("Subject not found"));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        metrics::track_session_created();
        info!(%session_id, "Attendance session started");

        Self::get_session(db, session_id, teacher_id).await
    }

    #[instrument(skip(db))]
    pub async fn list_sessions(
        db: &PgPool,
        teacher_id: UserId,
        filters: AttendanceSessionFilterParams,
    ) -> Result<PaginatedAttendanceSessionsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM attendance_sessions
            WHERE teacher_id = $1 AND ($2::BOOLEAN IS NULL OR is_active = $2)
            "#,
        )
        .bind(teacher_id)
        .bind(filters.is_active)
        .fetch_one(db)
        .await
        .context("Failed to count attendance sessions")
        .map_err(AppError::database)?;

        let query = format!(
            "{SESSION_RESPONSE_SELECT}
            WHERE s.teacher_id = $1 AND ($2::BOOLEAN IS NULL OR s.is_active = $2)
            ORDER BY s.start_time DESC
            LIMIT $3 OFFSET $4"
        );
        let data = sqlx::query_as::<_, AttendanceSessionResponse>(&query)
            .bind(teacher_id)
            .bind(filters.is_active)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await
            .context("Failed to fetch attendance sessions")
            .map_err(AppError::database)?;

        Ok(PaginatedAttendanceSessionsResponse {
            data,
            meta: PaginationMeta::new(&filters.pagination, total),
        })
    }

    /// Sessions owned by another teacher are reported as missing.
    #[instrument(skip(db))]
    pub async fn get_session(
        db: &PgPool,
        id: AttendanceSessionId,
        teacher_id: UserId,
    ) -> Result<AttendanceSessionResponse, AppError> {
        let query = format!("{SESSION_RESPONSE_SELECT} WHERE s.id = $1 AND s.teacher_id = $2");
        sqlx::query_as::<_, AttendanceSessionResponse>(&query)
            .bind(id)
            .bind(teacher_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch attendance session")
            .map_err(AppError::database)?
            .ok_or_else(session_not_found)
    }

    async fn find_owned_session(
        db: &PgPool,
        id: AttendanceSessionId,
        teacher_id: UserId,
    ) -> Result<AttendanceSession, AppError> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM attendance_sessions WHERE id = $1 AND teacher_id = $2"
        );
        sqlx::query_as::<_, AttendanceSession>(&query)
            .bind(id)
            .bind(teacher_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch attendance session")
            .map_err(AppError::database)?
            .ok_or_else(session_not_found)
    }

    /// Returns the session's current token, issuing a new one first when
    /// there is none or the stored one has expired.
    ///
    /// Renewal is a single conditional update, so concurrent readers crossing
    /// the same expiry produce exactly one new token; the others read it back.
    #[instrument(skip(db))]
    pub async fn current_qr(
        db: &PgPool,
        id: AttendanceSessionId,
        teacher_id: UserId,
        ttl_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<QrCodeResponse, AppError> {
        // Only stored when the update below matches; otherwise discarded.
        let candidate = QrToken::generate(id, now);
        let expires_at = QrToken::expiry(now, ttl_seconds);

        let query = format!(
            r#"
            UPDATE attendance_sessions
            SET current_qr_code = $3, qr_expires_at = $4
            WHERE id = $1 AND teacher_id = $2 AND is_active
              AND (current_qr_code IS NULL OR qr_expires_at IS NULL OR qr_expires_at <= $5)
            RETURNING {SESSION_COLUMNS}
            "#
        );
        let rotated = sqlx::query_as::<_, AttendanceSession>(&query)
            .bind(id)
            .bind(teacher_id)
            .bind(candidate.to_string())
            .bind(expires_at)
            .bind(now)
            .fetch_optional(db)
            .await
            .context("Failed to rotate QR token")
            .map_err(AppError::database)?;

        let session = match rotated {
            Some(session) => {
                metrics::track_qr_token_rotated();
                tracing::debug!(session_id = %id, %expires_at, "QR token rotated");
                session
            }
            None => {
                let session = Self::find_owned_session(db, id, teacher_id).await?;
                if !session.is_active {
                    return Err(AppError::bad_request(anyhow::anyhow!(
                        TokenRejection::Inactive.message()
                    )));
                }
                session
            }
        };

        // Unreachable for an active session: the update fills any missing token.
        let (Some(qr_code), Some(expires_at)) = (session.current_qr_code, session.qr_expires_at)
        else {
            return Err(AppError::internal_error(format!(
                "Session {} is active but has no QR token",
                id
            )));
        };

        Ok(QrCodeResponse {
            session_id: id,
            qr_image: svg_data_url(&qr_code)?,
            qr_code,
            expires_at,
        })
    }

    /// Closes the session. Takes the row lock that in-flight scans wait on.
    #[instrument(skip(db))]
    pub async fn end_session(
        db: &PgPool,
        id: AttendanceSessionId,
        teacher_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<AttendanceSessionResponse, AppError> {
        let ended = sqlx::query(
            r#"
            UPDATE attendance_sessions
            SET is_active = FALSE, end_time = $3
            WHERE id = $1 AND teacher_id = $2 AND is_active
            "#,
        )
        .bind(id)
        .bind(teacher_id)
        .bind(now)
        .execute(db)
        .await
        .context("Failed to end attendance session")
        .map_err(AppError::database)?;

        if ended.rows_affected() == 0 {
            // Either missing, someone else's, or already closed
            Self::find_owned_session(db, id, teacher_id).await?;
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Session has already ended"
            )));
        }

        metrics::track_session_ended();
        info!(session_id = %id, "Attendance session ended");

        Self::get_session(db, id, teacher_id).await
    }

    /// Records the calling student as present for the session named in `qr_code`.
    ///
    /// The session row is read `FOR SHARE` so a concurrent end-session either
    /// commits first (and the scan sees it inactive) or waits for this insert.
    /// Duplicates are resolved by the `(session_id, student_enrollment_number)`
    /// unique constraint.
    #[instrument(skip(db, qr_code))]
    pub async fn mark_attendance(
        db: &PgPool,
        student_id: UserId,
        qr_code: &str,
        ttl_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord, AppError> {
        let qr_code = qr_code.trim();
        let token: QrToken = qr_code.parse().map_err(|e| {
            warn!(error = %e, "Malformed QR code");
            metrics::track_attendance_rejected("malformed");
            AppError::bad_request(anyhow::anyhow!("Invalid QR code format"))
        })?;

        let enrollment_number: EnrollmentNumber = sqlx::query_scalar(
            "SELECT enrollment_number FROM student_profiles WHERE user_id = $1",
        )
        .bind(student_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student profile")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student profile not found")))?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let query =
            format!("SELECT {SESSION_COLUMNS} FROM attendance_sessions WHERE id = $1 FOR SHARE");
        let session = sqlx::query_as::<_, AttendanceSession>(&query)
            .bind(token.session_id)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to lock attendance session")
            .map_err(AppError::database)?
            .ok_or_else(session_not_found)?;

        check_token(&session, qr_code, &token, ttl_seconds, now).map_err(reject)?;

        let record = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            INSERT INTO attendance_records (session_id, student_enrollment_number, qr_code_used, marked_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (session_id, student_enrollment_number) DO NOTHING
            RETURNING id, session_id, student_enrollment_number, qr_code_used, marked_at, is_valid
            "#,
        )
        .bind(session.id)
        .bind(&enrollment_number)
        .bind(qr_code)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to record attendance")
        .map_err(AppError::database)?;

        let Some(record) = record else {
            metrics::track_attendance_rejected("duplicate");
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Attendance already marked for this session"
            )));
        };

        tx.commit()
            .await
            .context("Failed to commit attendance")
            .map_err(AppError::database)?;

        metrics::track_attendance_marked();
        info!(session_id = %session.id, student = %enrollment_number, "Attendance marked");

        Ok(record)
    }

    #[instrument(skip(db))]
    pub async fn session_attendance(
        db: &PgPool,
        id: AttendanceSessionId,
        teacher_id: UserId,
    ) -> Result<SessionAttendanceResponse, AppError> {
        let session = Self::find_owned_session(db, id, teacher_id).await?;

        let attendance_records = sqlx::query_as::<_, SessionAttendanceEntry>(
            r#"
            SELECT r.id, r.student_enrollment_number, sp.full_name AS student_name,
                   r.marked_at, r.is_valid
            FROM attendance_records r
            JOIN student_profiles sp ON sp.enrollment_number = r.student_enrollment_number
            WHERE r.session_id = $1
            ORDER BY r.marked_at, r.student_enrollment_number
            "#,
        )
        .bind(id)
        .fetch_all(db)
        .await
        .context("Failed to fetch session attendance")
        .map_err(AppError::database)?;

        Ok(SessionAttendanceResponse {
            session_id: session.id,
            session_name: session.session_name,
            is_active: session.is_active,
            total_attended: attendance_records.len() as i64,
            attendance_records,
        })
    }

    #[instrument(skip(db))]
    pub async fn student_records(
        db: &PgPool,
        student_id: UserId,
    ) -> Result<Vec<StudentAttendanceEntry>, AppError> {
        let records = sqlx::query_as::<_, StudentAttendanceEntry>(
            r#"
            SELECT r.id, r.session_id, s.session_name, sub.subject_code,
                   sub.name AS subject_name, r.marked_at, r.is_valid
            FROM attendance_records r
            JOIN student_profiles sp ON sp.enrollment_number = r.student_enrollment_number
            JOIN attendance_sessions s ON s.id = r.session_id
            JOIN subjects sub ON sub.id = s.subject_id
            WHERE sp.user_id = $1
            ORDER BY r.marked_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch attendance history")
        .map_err(AppError::database)?;

        Ok(records)
    }
}
