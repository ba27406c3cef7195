use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::enrollments::model::{
    BulkEnrollmentOutcome, BulkEnrollmentRequest, EnrollmentFilterParams, EnrollmentItemDto,
    EnrollmentListItem, EnrollmentOutcome, EnrollmentStats, StudentEnrollment,
    UpdateEnrollmentStatusDto,
};
use crate::modules::enrollments::service::EnrollmentService;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[utoipa::path(
    post,
    path = "/api/enrollments",
    request_body = EnrollmentItemDto,
    responses(
        (status = 201, description = "Student enrolled", body = EnrollmentOutcome),
        (status = 400, description = "Validation or provisioning failed", body = EnrollmentOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("gateway_identity" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state, item))]
pub async fn create_enrollment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(item): Json<EnrollmentItemDto>,
) -> Result<(StatusCode, Json<EnrollmentOutcome>), AppError> {
    let organization_id = auth_user.organization_id()?;
    let outcome = EnrollmentService::create_single_enrollment(
        &state.db,
        &state.email,
        organization_id,
        auth_user.user_id,
        &item,
    )
    .await;

    let status = if outcome.success {
        StatusCode::CREATED
    } else {
        StatusCode::BAD_REQUEST
    };

    Ok((status, Json(outcome)))
}

#[utoipa::path(
    post,
    path = "/api/enrollments/bulk",
    request_body = BulkEnrollmentRequest,
    responses(
        (status = 200, description = "Per-item report in input order", body = BulkEnrollmentOutcome),
        (status = 400, description = "Empty or oversized batch"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("gateway_identity" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state, dto))]
pub async fn bulk_enrollment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(dto): Json<BulkEnrollmentRequest>,
) -> Result<Json<BulkEnrollmentOutcome>, AppError> {
    let organization_id = auth_user.organization_id()?;
    let outcome = EnrollmentService::process_bulk_enrollment(
        &state.db,
        &state.email,
        organization_id,
        auth_user.user_id,
        &dto.items,
    )
    .await?;

    Ok(Json(outcome))
}

#[utoipa::path(
    get,
    path = "/api/enrollments",
    params(EnrollmentFilterParams),
    responses(
        (status = 200, description = "Enrollments for the caller's organization", body = [EnrollmentListItem]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("gateway_identity" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn list_enrollments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<EnrollmentFilterParams>,
) -> Result<Json<Vec<EnrollmentListItem>>, AppError> {
    let organization_id = auth_user.organization_id()?;
    let enrollments =
        EnrollmentService::get_enrollments(&state.db, organization_id, &filters).await?;
    Ok(Json(enrollments))
}

#[utoipa::path(
    get,
    path = "/api/enrollments/stats",
    responses(
        (status = 200, description = "Enrollment counts by status and grade level", body = EnrollmentStats),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("gateway_identity" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn enrollment_stats(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<EnrollmentStats>, AppError> {
    let organization_id = auth_user.organization_id()?;
    let stats = EnrollmentService::enrollment_stats(&state.db, organization_id).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    patch,
    path = "/api/enrollments/{id}/status",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    request_body = UpdateEnrollmentStatusDto,
    responses(
        (status = 200, description = "Updated enrollment", body = StudentEnrollment),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Enrollment not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("gateway_identity" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state, dto))]
pub async fn update_enrollment_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateEnrollmentStatusDto>,
) -> Result<Json<StudentEnrollment>, AppError> {
    let organization_id = auth_user.organization_id()?;
    let enrollment =
        EnrollmentService::update_enrollment_status(&state.db, organization_id, id, dto.status)
            .await?;
    Ok(Json(enrollment))
}

#[utoipa::path(
    delete,
    path = "/api/enrollments/{id}",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 204, description = "Enrollment soft-deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Enrollment not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("gateway_identity" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let organization_id = auth_user.organization_id()?;
    EnrollmentService::delete_enrollment(&state.db, organization_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
