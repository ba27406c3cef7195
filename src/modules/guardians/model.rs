use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A guardian record attached to a ward user.
///
/// A student can have several guardians; the earliest-created one is the
/// primary guardian by convention.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Guardian {
    pub id: Uuid,
    pub student_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub relation: String,
    pub age: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Fields for creating a guardian row. Callers validate format upstream;
/// the service only enforces the per-student email uniqueness constraint.
#[derive(Debug, Clone)]
pub struct NewGuardian {
    pub student_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub relation: String,
    pub age: Option<i32>,
}
