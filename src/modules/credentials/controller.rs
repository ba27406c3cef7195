use axum::{Json, extract::Path, extract::State};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::credentials::model::{
    CleanupResponse, InvalidateCredentialRequest, InvalidateCredentialResponse, IssuedCredential,
    ValidateCredentialRequest, ValidateCredentialResponse,
};
use crate::modules::credentials::service::CredentialService;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[utoipa::path(
    post,
    path = "/api/credentials/validate",
    request_body = ValidateCredentialRequest,
    responses(
        (status = 200, description = "Validation outcome", body = ValidateCredentialResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Credentials"
)]
#[instrument(skip(state, dto))]
pub async fn validate_credential(
    State(state): State<AppState>,
    Json(dto): Json<ValidateCredentialRequest>,
) -> Result<Json<ValidateCredentialResponse>, AppError> {
    let check = CredentialService::validate(
        &state.db,
        &dto.temp_code,
        dto.temp_password.as_deref().filter(|p| !p.is_empty()),
    )
    .await?;

    Ok(Json(check.into_response()))
}

#[utoipa::path(
    post,
    path = "/api/credentials/invalidate",
    request_body = InvalidateCredentialRequest,
    responses(
        (status = 200, description = "Whether a credential was flipped to used", body = InvalidateCredentialResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("gateway_identity" = [])),
    tag = "Credentials"
)]
#[instrument(skip(state, dto))]
pub async fn invalidate_credential(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Json(dto): Json<InvalidateCredentialRequest>,
) -> Result<Json<InvalidateCredentialResponse>, AppError> {
    let invalidated = CredentialService::invalidate(&state.db, &dto.temp_code).await?;
    Ok(Json(InvalidateCredentialResponse { invalidated }))
}

#[utoipa::path(
    post,
    path = "/api/credentials/users/{user_id}/reset",
    params(("user_id" = Uuid, Path, description = "Ward user ID")),
    responses(
        (status = 200, description = "Fresh credentials, plaintext returned once", body = IssuedCredential),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("gateway_identity" = [])),
    tag = "Credentials"
)]
#[instrument(skip(state))]
pub async fn reset_credential(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<IssuedCredential>, AppError> {
    let issued = CredentialService::issue_for_user(&state.db, user_id).await?;
    Ok(Json(issued))
}

#[utoipa::path(
    post,
    path = "/api/credentials/cleanup",
    responses(
        (status = 200, description = "Number of expired or used rows deleted", body = CleanupResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("gateway_identity" = [])),
    tag = "Credentials"
)]
#[instrument(skip(state))]
pub async fn cleanup_credentials(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<CleanupResponse>, AppError> {
    let deleted = CredentialService::cleanup_expired(&state.db).await?;
    Ok(Json(CleanupResponse { deleted }))
}
