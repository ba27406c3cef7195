use crate::modules::enrollments::controller::{
    bulk_enrollment, create_enrollment, delete_enrollment, enrollment_stats, list_enrollments,
    update_enrollment_status,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_enrollment).get(list_enrollments))
        .route("/bulk", post(bulk_enrollment))
        .route("/stats", get(enrollment_stats))
        .route("/{id}/status", patch(update_enrollment_status))
        .route("/{id}", delete(delete_enrollment))
}
