use anyhow::Context;
use axum::http::StatusCode;
use classcue_auth::{create_access_token, create_refresh_token, verify_refresh_token};
use classcue_config::JwtConfig;
use classcue_core::{AppError, hash_password, verify_password};
use classcue_models::auth::{
    LoginRequest, LoginResponse, RegisterStudentDto, RegisterTeacherDto, TokenPairResponse,
};
use classcue_models::{Email, EnrollmentNumber, SubjectId, User, UserId, UserResponse, UserRole};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, instrument, warn};

use crate::metrics;
use crate::modules::profile::service::ProfileService;

const USER_COLUMNS: &str = "u.id, u.email, u.password_hash, u.role, u.created_at, u.updated_at";

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid credentials".to_string())
}

pub struct AuthService;

impl AuthService {
    async fn insert_user(
        tx: &mut Transaction<'_, Postgres>,
        email: &Email,
        password: &str,
        role: UserRole,
    ) -> Result<UserId, AppError> {
        let password_hash = hash_password(password)?;

        sqlx::query_scalar(
            "INSERT INTO users (email, password_hash, role) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "User with email {} already exists",
                        email
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })
    }

    /// Replaces the subjects a teacher teaches.
    pub(crate) async fn assign_subjects(
        tx: &mut Transaction<'_, Postgres>,
        teacher_id: UserId,
        subject_ids: &[SubjectId],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM teacher_subjects WHERE teacher_id = $1")
            .bind(teacher_id)
            .execute(&mut **tx)
            .await
            .context("Failed to clear teacher subjects")
            .map_err(AppError::database)?;

        if subject_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO teacher_subjects (teacher_id, subject_id)
            SELECT $1, subject_id FROM UNNEST($2::uuid[]) AS subject_id
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(teacher_id)
        .bind(subject_ids)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!("Unknown subject id"));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Ok(())
    }

    #[instrument(skip(db, dto), fields(enrollment_number = %dto.enrollment_number))]
    pub async fn register_student(
        db: &PgPool,
        dto: RegisterStudentDto,
    ) -> Result<UserResponse, AppError> {
        let email = Email::new(&dto.email).map_err(AppError::bad_request)?;
        let enrollment_number =
            EnrollmentNumber::new(&dto.enrollment_number).map_err(AppError::bad_request)?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let user_id = Self::insert_user(&mut tx, &email, &dto.password, UserRole::Student).await?;

        sqlx::query(
            r#"
            INSERT INTO student_profiles (enrollment_number, user_id, full_name, department, semester)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&enrollment_number)
        .bind(user_id)
        .bind(dto.full_name.trim())
        .bind(dto.department.trim())
        .bind(dto.semester)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Student with enrollment number {} already exists",
                        enrollment_number
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        tx.commit()
            .await
            .context("Failed to commit registration")
            .map_err(AppError::database)?;

        metrics::track_user_registered(UserRole::Student.as_str());
        info!(%user_id, "Student registered");

        ProfileService::get_user(db, user_id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn register_teacher(
        db: &PgPool,
        dto: RegisterTeacherDto,
    ) -> Result<UserResponse, AppError> {
        let email = Email::new(&dto.email).map_err(AppError::bad_request)?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let user_id = Self::insert_user(&mut tx, &email, &dto.password, UserRole::Teacher).await?;

        sqlx::query(
            "INSERT INTO teacher_profiles (user_id, full_name, department) VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(dto.full_name.trim())
        .bind(dto.department.trim())
        .execute(&mut *tx)
        .await
        .context("Failed to create teacher profile")
        .map_err(AppError::database)?;

        Self::assign_subjects(&mut tx, user_id, &dto.subject_ids).await?;

        tx.commit()
            .await
            .context("Failed to commit registration")
            .map_err(AppError::database)?;

        metrics::track_user_registered(UserRole::Teacher.as_str());
        info!(%user_id, "Teacher registered");

        ProfileService::get_user(db, user_id).await
    }

    /// Students sign in with their enrollment number (or email), everyone
    /// else with their email. The requested role must match the account.
    #[instrument(skip(db, dto, jwt_config), fields(role = %dto.role))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let identifier = dto.identifier.trim();

        let user = if dto.role == UserRole::Student && EnrollmentNumber::looks_like(identifier) {
            let enrollment_number =
                EnrollmentNumber::new(identifier).map_err(|_| invalid_credentials())?;
            let query = format!(
                "SELECT {USER_COLUMNS} FROM users u \
                 JOIN student_profiles sp ON sp.user_id = u.id \
                 WHERE sp.enrollment_number = $1"
            );
            sqlx::query_as::<_, User>(&query)
                .bind(enrollment_number)
                .fetch_optional(db)
                .await
        } else {
            let query = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.email = $1");
            sqlx::query_as::<_, User>(&query)
                .bind(identifier.to_lowercase())
                .fetch_optional(db)
                .await
        }
        .context("Failed to look up user")
        .map_err(AppError::database)?;

        let Some(user) = user.filter(|u| u.role == dto.role) else {
            metrics::track_login(dto.role.as_str(), false);
            warn!("Login failed: unknown account or role mismatch");
            return Err(invalid_credentials());
        };

        if !verify_password(&dto.password, &user.password_hash)? {
            metrics::track_login(dto.role.as_str(), false);
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(invalid_credentials());
        }

        let tokens = Self::issue_tokens(user.id, user.email.as_str(), user.role, jwt_config)?;
        let user = ProfileService::get_user(db, user.id).await?;

        metrics::track_login(user.role.as_str(), true);
        info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            user,
        })
    }

    /// Exchanges a refresh token for a new pair. The account is re-read so a
    /// deleted user cannot keep refreshing.
    #[instrument(skip_all)]
    pub async fn refresh(
        db: &PgPool,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<TokenPairResponse, AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config)?;
        let user_id: UserId = claims
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid refresh token".to_string()))?;

        let user = ProfileService::get_user(db, user_id)
            .await
            .map_err(|e| {
                if e.status == StatusCode::NOT_FOUND {
                    AppError::unauthorized("Invalid refresh token".to_string())
                } else {
                    e
                }
            })?;

        Self::issue_tokens(user.id, user.email.as_str(), user.role, jwt_config)
    }

    fn issue_tokens(
        user_id: UserId,
        email: &str,
        role: UserRole,
        jwt_config: &JwtConfig,
    ) -> Result<TokenPairResponse, AppError> {
        Ok(TokenPairResponse {
            access_token: create_access_token(
                user_id.into_inner(),
                email,
                role.as_str(),
                jwt_config,
            )?,
            refresh_token: create_refresh_token(user_id.into_inner(), email, jwt_config)?,
        })
    }
}
