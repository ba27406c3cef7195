use crate::modules::credentials::controller::{
    cleanup_credentials, invalidate_credential, reset_credential, validate_credential,
};
use crate::state::AppState;
use axum::{Router, routing::post};

pub fn init_credentials_router() -> Router<AppState> {
    Router::new()
        .route("/validate", post(validate_credential))
        .route("/invalidate", post(invalidate_credential))
        .route("/users/{user_id}/reset", post(reset_credential))
        .route("/cleanup", post(cleanup_credentials))
}
