use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::organizations::service::OrganizationService;
use crate::modules::tokens::model::{
    CreateTokenDto, RedeemDecision, RedeemTokenResponse, RegistrationToken, TokenStatsResponse,
    TokenStatus, generate_token_string, redeem_decision,
};
use crate::utils::errors::AppError;
use crate::utils::temp_code::expiry_date;

const DEFAULT_MAX_USES: i32 = 1;
const DEFAULT_EXPIRES_IN_DAYS: i64 = 7;

const TOKEN_COLUMNS: &str = "id, token, generated_by_user_id, organization_id, status, \
     student_name, student_email, max_uses, current_uses, expires_at, used_at, \
     created_at, updated_at";

pub struct TokenService;

impl TokenService {
    /// Issue a registration token for an organization.
    #[instrument(skip(db, dto))]
    pub async fn create_token(
        db: &PgPool,
        organization_id: Uuid,
        actor_id: Uuid,
        dto: CreateTokenDto,
    ) -> Result<RegistrationToken, AppError> {
        let mut conn = db.acquire().await.map_err(AppError::database)?;
        OrganizationService::get_organization(&mut *conn, organization_id).await?;

        let token = sqlx::query_as::<_, RegistrationToken>(&format!(
            "INSERT INTO registration_tokens
                 (token, generated_by_user_id, organization_id, status, student_name,
                  student_email, max_uses, expires_at)
             VALUES ($1, $2, $3, 'ACTIVE', $4, $5, $6, $7)
             RETURNING {TOKEN_COLUMNS}"
        ))
        .bind(generate_token_string())
        .bind(actor_id)
        .bind(organization_id)
        .bind(&dto.student_name)
        .bind(&dto.student_email)
        .bind(dto.max_uses.unwrap_or(DEFAULT_MAX_USES))
        .bind(expiry_date(dto.expires_in_days.unwrap_or(DEFAULT_EXPIRES_IN_DAYS)))
        .fetch_one(&mut *conn)
        .await
        .map_err(AppError::database)?;

        info!(token_id = %token.id, "Registration token created");
        Ok(token)
    }

    /// Redeem a token: read, check and increment under a row lock in one
    /// transaction so two concurrent redemptions near the `max_uses`
    /// boundary cannot both consume the last slot. An ACTIVE row past its
    /// expiry is rewritten to EXPIRED here (lazy expiry) before failing.
    #[instrument(skip(db, token_string))]
    pub async fn redeem(
        db: &PgPool,
        token_string: &str,
    ) -> Result<RedeemTokenResponse, AppError> {
        let mut tx = db.begin().await.map_err(AppError::database)?;

        let token = sqlx::query_as::<_, RegistrationToken>(&format!(
            "SELECT {TOKEN_COLUMNS}
             FROM registration_tokens
             WHERE token = $1
             FOR UPDATE"
        ))
        .bind(token_string)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Registration token not found")))?;

        let expired = chrono::Utc::now() > token.expires_at;

        match redeem_decision(token.status, expired, token.current_uses, token.max_uses) {
            RedeemDecision::Fail(failure) => {
                // Persist the lazily observed expiry so later reads see it.
                if token.status == TokenStatus::Active && expired {
                    sqlx::query(
                        "UPDATE registration_tokens
                         SET status = 'EXPIRED', updated_at = NOW()
                         WHERE id = $1",
                    )
                    .bind(token.id)
                    .execute(&mut *tx)
                    .await
                    .map_err(AppError::database)?;
                    tx.commit().await.map_err(AppError::database)?;
                }

                Err(AppError::conflict(anyhow::anyhow!("{}", failure.message())))
            }
            RedeemDecision::Consume { exhausts } => {
                if exhausts {
                    sqlx::query(
                        "UPDATE registration_tokens
                         SET current_uses = current_uses + 1, status = 'USED',
                             used_at = NOW(), updated_at = NOW()
                         WHERE id = $1",
                    )
                    .bind(token.id)
                    .execute(&mut *tx)
                    .await
                    .map_err(AppError::database)?;
                } else {
                    sqlx::query(
                        "UPDATE registration_tokens
                         SET current_uses = current_uses + 1, updated_at = NOW()
                         WHERE id = $1",
                    )
                    .bind(token.id)
                    .execute(&mut *tx)
                    .await
                    .map_err(AppError::database)?;
                }

                let organization =
                    OrganizationService::get_organization(&mut *tx, token.organization_id)
                        .await?;

                tx.commit().await.map_err(AppError::database)?;

                info!(token_id = %token.id, exhausts, "Registration token redeemed");

                Ok(RedeemTokenResponse {
                    organization_id: token.organization_id,
                    organization_name: organization.name,
                    student_name: token.student_name,
                    student_email: token.student_email,
                    remaining_uses: token.max_uses - token.current_uses - 1,
                })
            }
        }
    }

    /// Revoke an ACTIVE token. Irreversible.
    #[instrument(skip(db))]
    pub async fn revoke(
        db: &PgPool,
        organization_id: Uuid,
        token_id: Uuid,
    ) -> Result<RegistrationToken, AppError> {
        let revoked = sqlx::query_as::<_, RegistrationToken>(&format!(
            "UPDATE registration_tokens
             SET status = 'REVOKED', updated_at = NOW()
             WHERE id = $1 AND organization_id = $2 AND status = 'ACTIVE'
             RETURNING {TOKEN_COLUMNS}"
        ))
        .bind(token_id)
        .bind(organization_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?;

        if let Some(token) = revoked {
            info!(token_id = %token.id, "Registration token revoked");
            return Ok(token);
        }

        // Distinguish an unknown token from one already in a terminal state.
        let existing = sqlx::query_as::<_, RegistrationToken>(&format!(
            "SELECT {TOKEN_COLUMNS}
             FROM registration_tokens
             WHERE id = $1 AND organization_id = $2"
        ))
        .bind(token_id)
        .bind(organization_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?;

        match existing {
            None => Err(AppError::not_found(anyhow::anyhow!(
                "Registration token not found"
            ))),
            Some(token) => Err(AppError::conflict(anyhow::anyhow!(
                "Only active tokens can be revoked (current status: {})",
                token.status.as_str()
            ))),
        }
    }

    /// Tokens for an organization, newest first, optionally filtered by
    /// status. Capped; token administration is not a browsing surface.
    #[instrument(skip(db))]
    pub async fn list_tokens(
        db: &PgPool,
        organization_id: Uuid,
        status: Option<TokenStatus>,
    ) -> Result<Vec<RegistrationToken>, AppError> {
        let tokens = sqlx::query_as::<_, RegistrationToken>(&format!(
            "SELECT {TOKEN_COLUMNS}
             FROM registration_tokens
             WHERE organization_id = $1
               AND ($2::token_status IS NULL OR status = $2)
             ORDER BY created_at DESC
             LIMIT 200"
        ))
        .bind(organization_id)
        .bind(status)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(tokens)
    }

    /// Per-status counts for an organization. Overdue ACTIVE rows are
    /// counted as expired even if cleanup has not rewritten them yet.
    #[instrument(skip(db))]
    pub async fn token_stats(
        db: &PgPool,
        organization_id: Uuid,
    ) -> Result<TokenStatsResponse, AppError> {
        let stats = sqlx::query_as::<_, TokenStatsResponse>(
            "SELECT
                 COUNT(*) AS total,
                 COUNT(*) FILTER (WHERE status = 'ACTIVE' AND expires_at > NOW()) AS active,
                 COUNT(*) FILTER (WHERE status = 'USED') AS used,
                 COUNT(*) FILTER (WHERE status = 'EXPIRED'
                                  OR (status = 'ACTIVE' AND expires_at <= NOW())) AS expired,
                 COUNT(*) FILTER (WHERE status = 'REVOKED') AS revoked
             FROM registration_tokens
             WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        Ok(stats)
    }

    /// Rewrite overdue ACTIVE rows to EXPIRED. Advisory; redemption applies
    /// the same check lazily, so correctness never depends on this running.
    #[instrument(skip(db))]
    pub async fn cleanup_expired(db: &PgPool) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE registration_tokens
             SET status = 'EXPIRED', updated_at = NOW()
             WHERE status = 'ACTIVE' AND expires_at < NOW()",
        )
        .execute(db)
        .await
        .map_err(AppError::database)?;

        Ok(result.rows_affected())
    }
}
