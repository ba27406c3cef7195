use crate::modules::tokens::controller::{
    create_token, list_tokens, redeem_token, revoke_token, token_stats,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_tokens_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_token).get(list_tokens))
        .route("/stats", get(token_stats))
        .route("/redeem", post(redeem_token))
        .route("/{id}/revoke", post(revoke_token))
}
