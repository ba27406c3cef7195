use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// An organization (tenant). Full organization CRUD lives in the admin
/// service; this backend only ever resolves organizations by id.
#[derive(Serialize, FromRow, Debug, Clone)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}
