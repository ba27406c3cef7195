use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A temporary credential row. `temp_password` is the bcrypt hash; the
/// plaintext only exists in [`IssuedCredential`] on its way to the guardian.
#[derive(FromRow, Debug, Clone)]
pub struct TemporaryCredential {
    pub id: Uuid,
    pub user_id: Uuid,
    pub temp_code: String,
    pub temp_password: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub is_used: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Freshly issued credentials, returned exactly once for out-of-band
/// delivery. Never logged, never persisted in this form.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct IssuedCredential {
    pub temp_code: String,
    pub temp_password: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Outcome of a credential check, before it is flattened into the
/// user-facing response. `NotFound` and `BadPassword` are deliberately
/// indistinguishable in the response; the kinds stay separate here for
/// logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialCheck {
    Ok { user_id: Uuid },
    BadFormat,
    NotFound,
    AlreadyUsed,
    Expired,
    BadPassword,
}

impl CredentialCheck {
    pub fn into_response(self) -> ValidateCredentialResponse {
        match self {
            CredentialCheck::Ok { user_id } => ValidateCredentialResponse {
                is_valid: true,
                user_id: Some(user_id),
                error: None,
            },
            CredentialCheck::BadFormat => ValidateCredentialResponse::failure(
                "Invalid temporary code format",
            ),
            CredentialCheck::NotFound | CredentialCheck::BadPassword => {
                ValidateCredentialResponse::failure("Invalid temporary credentials")
            }
            CredentialCheck::AlreadyUsed => ValidateCredentialResponse::failure(
                "These credentials have already been used. Please contact your administrator.",
            ),
            CredentialCheck::Expired => ValidateCredentialResponse::failure(
                "These credentials have expired. Please contact your administrator.",
            ),
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ValidateCredentialRequest {
    pub temp_code: String,
    /// Omit to confirm code validity only (e.g. before a password-change
    /// step mid-flow).
    pub temp_password: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ValidateCredentialResponse {
    pub is_valid: bool,
    pub user_id: Option<Uuid>,
    pub error: Option<String>,
}

impl ValidateCredentialResponse {
    fn failure(error: &str) -> Self {
        Self {
            is_valid: false,
            user_id: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct InvalidateCredentialRequest {
    pub temp_code: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct InvalidateCredentialResponse {
    pub invalidated: bool,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CleanupResponse {
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_and_bad_password_share_a_message() {
        let a = CredentialCheck::NotFound.into_response();
        let b = CredentialCheck::BadPassword.into_response();
        assert_eq!(a.error, b.error);
        assert!(!a.is_valid);
        assert!(a.user_id.is_none());
    }

    #[test]
    fn test_used_and_expired_are_specific() {
        let used = CredentialCheck::AlreadyUsed.into_response();
        let expired = CredentialCheck::Expired.into_response();
        assert_ne!(used.error, expired.error);
    }
}
