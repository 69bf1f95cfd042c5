use anyhow::Context;
use classcue_core::AppError;
use classcue_models::subjects::{Subject, SubjectFilterParams};
use classcue_models::{SubjectId, UserId};
use sqlx::PgPool;
use tracing::instrument;

const SUBJECT_COLUMNS: &str = "s.id, s.subject_code, s.name, s.semester, s.created_at";

pub struct SubjectService;

impl SubjectService {
    #[instrument(skip(db))]
    pub async fn list_subjects(
        db: &PgPool,
        filters: SubjectFilterParams,
    ) -> Result<Vec<Subject>, AppError> {
        let query = format!(
            "SELECT {SUBJECT_COLUMNS} FROM subjects s \
             WHERE ($1::INTEGER IS NULL OR s.semester = $1) \
             ORDER BY s.semester, s.subject_code"
        );

        sqlx::query_as::<_, Subject>(&query)
            .bind(filters.semester)
            .fetch_all(db)
            .await
            .context("Failed to fetch subjects")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_subject(db: &PgPool, id: SubjectId) -> Result<Subject, AppError> {
        let query = format!("SELECT {SUBJECT_COLUMNS} FROM subjects s WHERE s.id = $1");

        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch subject")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Subject not found")))
    }

    /// Subjects assigned to a teacher, in catalog order.
    #[instrument(skip(db))]
    pub async fn subjects_for_teacher(
        db: &PgPool,
        teacher_id: UserId,
    ) -> Result<Vec<Subject>, AppError> {
        let query = format!(
            "SELECT {SUBJECT_COLUMNS} FROM subjects s \
             JOIN teacher_subjects ts ON ts.subject_id = s.id \
             WHERE ts.teacher_id = $1 \
             ORDER BY s.semester, s.subject_code"
        );

        sqlx::query_as::<_, Subject>(&query)
            .bind(teacher_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch teacher subjects")
            .map_err(AppError::database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "./migrations")]
    async fn seeded_catalog_is_ordered(pool: PgPool) {
        let subjects = SubjectService::list_subjects(&pool, SubjectFilterParams::default())
            .await
            .unwrap();
        let codes: Vec<&str> = subjects.iter().map(|s| s.subject_code.as_str()).collect();
        assert_eq!(codes, vec!["CS101", "CS102", "CS201", "CS202"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn semester_filter(pool: PgPool) {
        let subjects = SubjectService::list_subjects(
            &pool,
            SubjectFilterParams {
                semester: Some(3),
            },
        )
        .await
        .unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].name, "Database Management");

        let none = SubjectService::list_subjects(
            &pool,
            SubjectFilterParams {
                semester: Some(9),
            },
        )
        .await
        .unwrap();
        assert!(none.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn get_subject_by_id(pool: PgPool) {
        let all = SubjectService::list_subjects(&pool, SubjectFilterParams::default())
            .await
            .unwrap();
        let subject = SubjectService::get_subject(&pool, all[0].id).await.unwrap();
        assert_eq!(subject, all[0]);

        let err = SubjectService::get_subject(&pool, SubjectId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }
}
