use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::modules::credentials::model::{CredentialCheck, IssuedCredential, TemporaryCredential};
use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::temp_code;

/// Issued credentials are valid for five days.
const EXPIRY_DAYS: i64 = 5;

pub struct CredentialService;

impl CredentialService {
    /// Generate and persist a temporary credential for a user. Only the
    /// bcrypt hash of the password is stored; the plaintext is returned
    /// once for out-of-band delivery.
    ///
    /// Takes a connection so the enrollment workflow can issue credentials
    /// inside its provisioning transaction.
    #[instrument(skip(conn))]
    pub async fn issue(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<IssuedCredential, AppError> {
        let code = temp_code::generate_code();
        let password = temp_code::generate_password(temp_code::DEFAULT_PASSWORD_LENGTH);
        let expires_at = temp_code::expiry_date(EXPIRY_DAYS);

        let hashed = hash_password(&password)?;

        sqlx::query(
            "INSERT INTO temporary_credentials (user_id, temp_code, temp_password, expires_at, is_used)
             VALUES ($1, $2, $3, $4, FALSE)",
        )
        .bind(user_id)
        .bind(&code)
        .bind(&hashed)
        .bind(expires_at)
        .execute(&mut *conn)
        .await
        .map_err(AppError::database)?;

        Ok(IssuedCredential {
            temp_code: code,
            temp_password: password,
            expires_at,
        })
    }

    /// Issue a fresh credential for a user outside any larger transaction
    /// (admin credential-reset flow). The previous credential is superseded
    /// by creation order, not deleted.
    #[instrument(skip(db))]
    pub async fn issue_for_user(db: &PgPool, user_id: Uuid) -> Result<IssuedCredential, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE id = $1 AND is_active)",
        )
        .bind(user_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("User not found")));
        }

        let mut conn = db.acquire().await.map_err(AppError::database)?;
        Self::issue(&mut *conn, user_id).await
    }

    /// Check a temp code (and optionally its password) without consuming it.
    /// Consuming is a separate, explicit [`Self::invalidate`] call made only
    /// after the user's real credentials are established.
    #[instrument(skip(db, password))]
    pub async fn validate(
        db: &PgPool,
        code: &str,
        password: Option<&str>,
    ) -> Result<CredentialCheck, AppError> {
        // Cheap structural pre-filter before touching the database.
        if !temp_code::is_valid_code_format(code) {
            return Ok(CredentialCheck::BadFormat);
        }

        let credential = sqlx::query_as::<_, TemporaryCredential>(
            "SELECT id, user_id, temp_code, temp_password, expires_at, is_used, created_at
             FROM temporary_credentials
             WHERE temp_code = $1",
        )
        .bind(code)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?;

        let Some(credential) = credential else {
            warn!("Temp code not found");
            return Ok(CredentialCheck::NotFound);
        };

        if credential.is_used {
            warn!(user_id = %credential.user_id, "Temp code already used");
            return Ok(CredentialCheck::AlreadyUsed);
        }

        if Utc::now() > credential.expires_at {
            warn!(user_id = %credential.user_id, "Temp code expired");
            return Ok(CredentialCheck::Expired);
        }

        if let Some(password) = password {
            if !verify_password(password, &credential.temp_password)? {
                warn!(user_id = %credential.user_id, "Temp password mismatch");
                return Ok(CredentialCheck::BadPassword);
            }
        }

        Ok(CredentialCheck::Ok {
            user_id: credential.user_id,
        })
    }

    /// Mark a credential used. Idempotent: returns whether a row was
    /// actually flipped (false when already used or missing).
    #[instrument(skip(db))]
    pub async fn invalidate(db: &PgPool, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE temporary_credentials
             SET is_used = TRUE
             WHERE temp_code = $1 AND is_used = FALSE",
        )
        .bind(code)
        .execute(db)
        .await
        .map_err(AppError::database)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete expired or used rows. Advisory maintenance only; lazy expiry
    /// at read time keeps validation correct even if this never runs.
    #[instrument(skip(db))]
    pub async fn cleanup_expired(db: &PgPool) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM temporary_credentials
             WHERE expires_at < NOW() OR is_used = TRUE",
        )
        .execute(db)
        .await
        .map_err(AppError::database)?;

        Ok(result.rows_affected())
    }

    /// Most recently issued live credential for a user. Older unexpired
    /// rows are superseded by creation order.
    #[instrument(skip(db))]
    pub async fn get_by_user(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<TemporaryCredential>, AppError> {
        let credential = sqlx::query_as::<_, TemporaryCredential>(
            "SELECT id, user_id, temp_code, temp_password, expires_at, is_used, created_at
             FROM temporary_credentials
             WHERE user_id = $1 AND is_used = FALSE AND expires_at > NOW()
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?;

        Ok(credential)
    }
}
