use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::organizations::model::Organization;
use crate::utils::errors::AppError;

pub struct OrganizationService;

impl OrganizationService {
    /// Resolve an organization by id, treating soft-deleted rows as absent.
    ///
    /// Takes a connection rather than a pool so it can participate in a
    /// caller-owned transaction (the enrollment workflow resolves the
    /// organization as its first transactional step).
    #[instrument(skip(conn))]
    pub async fn get_organization(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Organization, AppError> {
        let organization = sqlx::query_as::<_, Organization>(
            "SELECT id, name, contact_email, created_at, updated_at, deleted_at
             FROM organizations
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Organization not found")))?;

        Ok(organization)
    }
}
