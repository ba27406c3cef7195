use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::tokens::model::{
    CreateTokenDto, RedeemTokenRequest, RedeemTokenResponse, RegistrationToken, TokenListParams,
    TokenStatsResponse,
};
use crate::modules::tokens::service::TokenService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/tokens",
    request_body = CreateTokenDto,
    responses(
        (status = 201, description = "Registration token created", body = RegistrationToken),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Organization not found"),
        (status = 422, description = "Validation failed"),
        (status = 500, description = "Internal server error")
    ),
    security(("gateway_identity" = [])),
    tag = "Tokens"
)]
#[instrument(skip(state, dto))]
pub async fn create_token(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateTokenDto>,
) -> Result<(StatusCode, Json<RegistrationToken>), AppError> {
    let organization_id = auth_user.organization_id()?;
    let token =
        TokenService::create_token(&state.db, organization_id, auth_user.user_id, dto).await?;
    Ok((StatusCode::CREATED, Json(token)))
}

#[utoipa::path(
    post,
    path = "/api/tokens/redeem",
    request_body = RedeemTokenRequest,
    responses(
        (status = 200, description = "Token redeemed", body = RedeemTokenResponse),
        (status = 404, description = "Token not found"),
        (status = 409, description = "Token already used, expired or revoked"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Tokens"
)]
#[instrument(skip(state, dto))]
pub async fn redeem_token(
    State(state): State<AppState>,
    Json(dto): Json<RedeemTokenRequest>,
) -> Result<Json<RedeemTokenResponse>, AppError> {
    let redeemed = TokenService::redeem(&state.db, &dto.token).await?;
    Ok(Json(redeemed))
}

#[utoipa::path(
    post,
    path = "/api/tokens/{id}/revoke",
    params(("id" = Uuid, Path, description = "Token ID")),
    responses(
        (status = 200, description = "Token revoked", body = RegistrationToken),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Token not found"),
        (status = 409, description = "Token not in a revocable state"),
        (status = 500, description = "Internal server error")
    ),
    security(("gateway_identity" = [])),
    tag = "Tokens"
)]
#[instrument(skip(state))]
pub async fn revoke_token(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RegistrationToken>, AppError> {
    let organization_id = auth_user.organization_id()?;
    let token = TokenService::revoke(&state.db, organization_id, id).await?;
    Ok(Json(token))
}

#[utoipa::path(
    get,
    path = "/api/tokens",
    params(TokenListParams),
    responses(
        (status = 200, description = "Tokens for the caller's organization", body = [RegistrationToken]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("gateway_identity" = [])),
    tag = "Tokens"
)]
#[instrument(skip(state))]
pub async fn list_tokens(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<TokenListParams>,
) -> Result<Json<Vec<RegistrationToken>>, AppError> {
    let organization_id = auth_user.organization_id()?;
    let tokens = TokenService::list_tokens(&state.db, organization_id, params.status).await?;
    Ok(Json(tokens))
}

#[utoipa::path(
    get,
    path = "/api/tokens/stats",
    responses(
        (status = 200, description = "Per-status token counts", body = TokenStatsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("gateway_identity" = [])),
    tag = "Tokens"
)]
#[instrument(skip(state))]
pub async fn token_stats(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<TokenStatsResponse>, AppError> {
    let organization_id = auth_user.organization_id()?;
    let stats = TokenService::token_stats(&state.db, organization_id).await?;
    Ok(Json(stats))
}
