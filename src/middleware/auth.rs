use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Identity of the authenticated caller.
///
/// Authentication itself is terminated upstream (JWT verification and role
/// resolution happen at the gateway); by the time a request reaches this
/// service the gateway has stamped the verified identity onto the
/// `x-user-id` and `x-organization-id` headers. This extractor only parses
/// those headers and rejects requests that arrive without them.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub organization_id: Option<Uuid>,
}

impl AuthUser {
    /// Organization scope of the caller; forbidden for callers without one.
    pub fn organization_id(&self) -> Result<Uuid, AppError> {
        self.organization_id
            .ok_or_else(|| AppError::forbidden("User is not scoped to an organization"))
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or_else(|| AppError::unauthorized("Missing or invalid x-user-id header"))?;

        let organization_id = parts
            .headers
            .get("x-organization-id")
            .and_then(|v| v.to_str().ok())
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|_| AppError::unauthorized("Invalid x-organization-id header"))?;

        Ok(AuthUser {
            user_id,
            organization_id,
        })
    }
}
