use sqlx::{PgConnection, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::guardians::model::{Guardian, NewGuardian};
use crate::utils::errors::AppError;

pub struct GuardianService;

impl GuardianService {
    /// Insert a guardian row. A second guardian with the same email for the
    /// same student is a conflict, not a duplicate row.
    #[instrument(skip(conn, guardian), fields(student_id = %guardian.student_id))]
    pub async fn create_guardian(
        conn: &mut PgConnection,
        guardian: NewGuardian,
    ) -> Result<Guardian, AppError> {
        let created = sqlx::query_as::<_, Guardian>(
            "INSERT INTO guardians (student_id, first_name, last_name, email, phone, relation, age)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, student_id, first_name, last_name, email, phone, relation, age,
                       created_at, updated_at",
        )
        .bind(guardian.student_id)
        .bind(&guardian.first_name)
        .bind(&guardian.last_name)
        .bind(&guardian.email)
        .bind(&guardian.phone)
        .bind(&guardian.relation)
        .bind(guardian.age)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "A guardian with this email already exists for this student"
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Ok(created)
    }

    /// All guardians for a student, primary (earliest-created) first.
    #[instrument(skip(db))]
    pub async fn get_guardians_by_student(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<Guardian>, AppError> {
        let guardians = sqlx::query_as::<_, Guardian>(
            "SELECT id, student_id, first_name, last_name, email, phone, relation, age,
                    created_at, updated_at
             FROM guardians
             WHERE student_id = $1
             ORDER BY created_at ASC",
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(guardians)
    }
}
