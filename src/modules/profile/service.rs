use anyhow::Context;
use classcue_core::AppError;
use classcue_models::profiles::{
    ProfileResponse, StudentProfile, TeacherProfile, TeacherProfileWithSubjects, UpdateProfileDto,
    normalize_tags,
};
use classcue_models::{UserId, UserResponse, UserRole};
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::modules::auth::service::AuthService;
use crate::modules::subjects::service::SubjectService;

const STUDENT_PROFILE_COLUMNS: &str = "enrollment_number, user_id, full_name, department, \
     semester, interests, skills, goals, created_at, updated_at";

const TEACHER_PROFILE_COLUMNS: &str = "user_id, full_name, department, created_at, updated_at";

pub struct ProfileService;

impl ProfileService {
    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, user_id: UserId) -> Result<UserResponse, AppError> {
        sqlx::query_as::<_, UserResponse>(
            r#"
            SELECT u.id, u.email, u.role,
                   COALESCE(sp.full_name, tp.full_name) AS full_name,
                   u.created_at
            FROM users u
            LEFT JOIN student_profiles sp ON sp.user_id = u.id
            LEFT JOIN teacher_profiles tp ON tp.user_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    async fn student_profile(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<Option<StudentProfile>, AppError> {
        let query = format!("SELECT {STUDENT_PROFILE_COLUMNS} FROM student_profiles WHERE user_id = $1");
        sqlx::query_as::<_, StudentProfile>(&query)
            .bind(user_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch student profile")
            .map_err(AppError::database)
    }

    async fn teacher_profile(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<Option<TeacherProfileWithSubjects>, AppError> {
        let query = format!("SELECT {TEACHER_PROFILE_COLUMNS} FROM teacher_profiles WHERE user_id = $1");
        let profile = sqlx::query_as::<_, TeacherProfile>(&query)
            .bind(user_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch teacher profile")
            .map_err(AppError::database)?;

        let Some(profile) = profile else {
            return Ok(None);
        };

        let subjects = SubjectService::subjects_for_teacher(db, user_id).await?;
        Ok(Some(TeacherProfileWithSubjects { profile, subjects }))
    }

    #[instrument(skip(db))]
    pub async fn get_profile(db: &PgPool, user_id: UserId) -> Result<ProfileResponse, AppError> {
        let user = Self::get_user(db, user_id).await?;

        let (student_profile, teacher_profile) = match user.role {
            UserRole::Student => (Self::student_profile(db, user_id).await?, None),
            UserRole::Teacher => (None, Self::teacher_profile(db, user_id).await?),
            UserRole::Admin => (None, None),
        };

        Ok(ProfileResponse {
            user,
            student_profile,
            teacher_profile,
        })
    }

    /// Applies a partial update to the caller's own profile. Fields belonging
    /// to another role are rejected rather than ignored.
    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &PgPool,
        user_id: UserId,
        role: UserRole,
        dto: UpdateProfileDto,
    ) -> Result<ProfileResponse, AppError> {
        match role {
            UserRole::Student => Self::update_student(db, user_id, dto).await?,
            UserRole::Teacher => Self::update_teacher(db, user_id, dto).await?,
            UserRole::Admin => {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Admin accounts have no profile to update"
                )));
            }
        }

        info!(%user_id, %role, "Profile updated");
        Self::get_profile(db, user_id).await
    }

    async fn update_student(
        db: &PgPool,
        user_id: UserId,
        dto: UpdateProfileDto,
    ) -> Result<(), AppError> {
        if dto.subject_ids.is_some() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "subject_ids can only be set by teachers"
            )));
        }

        let result = sqlx::query(
            r#"
            UPDATE student_profiles
            SET full_name = COALESCE($2, full_name),
                department = COALESCE($3, department),
                semester = COALESCE($4, semester),
                interests = COALESCE($5, interests),
                skills = COALESCE($6, skills),
                goals = COALESCE($7, goals),
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(dto.full_name.as_deref().map(str::trim))
        .bind(dto.department.as_deref().map(str::trim))
        .bind(dto.semester)
        .bind(dto.interests.map(normalize_tags))
        .bind(dto.skills.map(normalize_tags))
        .bind(dto.goals.map(normalize_tags))
        .execute(db)
        .await
        .context("Failed to update student profile")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Student profile not found"
            )));
        }

        Ok(())
    }

    async fn update_teacher(
        db: &PgPool,
        user_id: UserId,
        dto: UpdateProfileDto,
    ) -> Result<(), AppError> {
        if dto.touches_student_fields() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "semester, interests, skills and goals can only be set by students"
            )));
        }

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let result = sqlx::query(
            r#"
            UPDATE teacher_profiles
            SET full_name = COALESCE($2, full_name),
                department = COALESCE($3, department),
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(dto.full_name.as_deref().map(str::trim))
        .bind(dto.department.as_deref().map(str::trim))
        .execute(&mut *tx)
        .await
        .context("Failed to update teacher profile")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Teacher profile not found"
            )));
        }

        if let Some(subject_ids) = &dto.subject_ids {
            AuthService::assign_subjects(&mut tx, user_id, subject_ids).await?;
        }

        tx.commit()
            .await
            .context("Failed to commit profile update")
            .map_err(AppError::database)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classcue_models::SubjectId;
    use classcue_models::auth::{RegisterStudentDto, RegisterTeacherDto};

    async fn subject(db: &PgPool, code: &str) -> SubjectId {
        sqlx::query_scalar("SELECT id FROM subjects WHERE subject_code = $1")
            .bind(code)
            .fetch_one(db)
            .await
            .unwrap()
    }

    async fn register_student(db: &PgPool) -> UserId {
        let dto = RegisterStudentDto {
            email: "ada@example.com".into(),
            password: "password123".into(),
            full_name: "Ada Lovelace".into(),
            enrollment_number: "CS2024001".into(),
            department: "Computer Science".into(),
            semester: 3,
        };
        AuthService::register_student(db, dto).await.unwrap().id
    }

    async fn register_teacher(db: &PgPool, subject_ids: Vec<SubjectId>) -> UserId {
        let dto = RegisterTeacherDto {
            email: "grace@example.com".into(),
            password: "password123".into(),
            full_name: "Grace Hopper".into(),
            department: "Computer Science".into(),
            subject_ids,
        };
        AuthService::register_teacher(db, dto).await.unwrap().id
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn user_carries_profile_name(pool: PgPool) {
        let id = register_student(&pool).await;
        let user = ProfileService::get_user(&pool, id).await.unwrap();
        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.full_name.as_deref(), Some("Ada Lovelace"));

        let err = ProfileService::get_user(&pool, UserId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn student_profile_update_normalizes_tags(pool: PgPool) {
        let id = register_student(&pool).await;
        let dto = UpdateProfileDto {
            semester: Some(4),
            interests: Some(vec![" Rust ".into(), "rust".into(), "".into(), "SQL".into()]),
            ..Default::default()
        };

        let profile = ProfileService::update_profile(&pool, id, UserRole::Student, dto)
            .await
            .unwrap();
        let student = profile.student_profile.unwrap();
        assert_eq!(student.semester, 4);
        assert_eq!(student.interests, vec!["Rust".to_string(), "SQL".to_string()]);
        assert!(student.skills.is_empty());
        assert_eq!(student.full_name, "Ada Lovelace");
        assert!(profile.teacher_profile.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn student_cannot_set_subjects(pool: PgPool) {
        let id = register_student(&pool).await;
        let dto = UpdateProfileDto {
            subject_ids: Some(vec![subject(&pool, "CS101").await]),
            ..Default::default()
        };
        let err = ProfileService::update_profile(&pool, id, UserRole::Student, dto)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn teacher_subjects_are_replaced(pool: PgPool) {
        let cs101 = subject(&pool, "CS101").await;
        let cs201 = subject(&pool, "CS201").await;
        let id = register_teacher(&pool, vec![cs101]).await;

        let profile = ProfileService::get_profile(&pool, id).await.unwrap();
        let teacher = profile.teacher_profile.unwrap();
        assert_eq!(teacher.subjects.len(), 1);
        assert_eq!(teacher.subjects[0].subject_code, "CS101");

        let dto = UpdateProfileDto {
            department: Some("Mathematics".into()),
            subject_ids: Some(vec![cs201]),
            ..Default::default()
        };
        let profile = ProfileService::update_profile(&pool, id, UserRole::Teacher, dto)
            .await
            .unwrap();
        let teacher = profile.teacher_profile.unwrap();
        assert_eq!(teacher.profile.department, "Mathematics");
        let codes: Vec<&str> = teacher.subjects.iter().map(|s| s.subject_code.as_str()).collect();
        assert_eq!(codes, vec!["CS201"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn teacher_update_rolls_back_on_unknown_subject(pool: PgPool) {
        let id = register_teacher(&pool, vec![]).await;
        let dto = UpdateProfileDto {
            full_name: Some("Rear Admiral Hopper".into()),
            subject_ids: Some(vec![SubjectId::new()]),
            ..Default::default()
        };
        let err = ProfileService::update_profile(&pool, id, UserRole::Teacher, dto)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);

        let user = ProfileService::get_user(&pool, id).await.unwrap();
        assert_eq!(user.full_name.as_deref(), Some("Grace Hopper"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn teacher_cannot_set_student_fields(pool: PgPool) {
        let id = register_teacher(&pool, vec![]).await;
        let dto = UpdateProfileDto {
            semester: Some(2),
            ..Default::default()
        };
        let err = ProfileService::update_profile(&pool, id, UserRole::Teacher, dto)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
    }
}
