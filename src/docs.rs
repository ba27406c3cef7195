use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::credentials::model::{
    CleanupResponse, InvalidateCredentialRequest, InvalidateCredentialResponse, IssuedCredential,
    ValidateCredentialRequest, ValidateCredentialResponse,
};
use crate::modules::enrollments::model::{
    BulkEnrollmentOutcome, BulkEnrollmentRequest, BulkItemResult, EnrollmentDetailsDto,
    EnrollmentItemDto, EnrollmentListItem, EnrollmentOutcome, EnrollmentStats, EnrollmentStatus,
    GradeLevelCount, GuardianDetailsDto, StatusCount, StudentDetailsDto, StudentEnrollment,
    UpdateEnrollmentStatusDto,
};
use crate::modules::tokens::model::{
    CreateTokenDto, RedeemTokenRequest, RedeemTokenResponse, RegistrationToken, TokenStatsResponse,
    TokenStatus,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::enrollments::controller::create_enrollment,
        crate::modules::enrollments::controller::bulk_enrollment,
        crate::modules::enrollments::controller::list_enrollments,
        crate::modules::enrollments::controller::enrollment_stats,
        crate::modules::enrollments::controller::update_enrollment_status,
        crate::modules::enrollments::controller::delete_enrollment,
        crate::modules::tokens::controller::create_token,
        crate::modules::tokens::controller::list_tokens,
        crate::modules::tokens::controller::token_stats,
        crate::modules::tokens::controller::redeem_token,
        crate::modules::tokens::controller::revoke_token,
        crate::modules::credentials::controller::validate_credential,
        crate::modules::credentials::controller::invalidate_credential,
        crate::modules::credentials::controller::reset_credential,
        crate::modules::credentials::controller::cleanup_credentials,
    ),
    components(
        schemas(
            EnrollmentStatus,
            StudentEnrollment,
            StudentDetailsDto,
            GuardianDetailsDto,
            EnrollmentDetailsDto,
            EnrollmentItemDto,
            EnrollmentOutcome,
            BulkEnrollmentRequest,
            BulkItemResult,
            BulkEnrollmentOutcome,
            EnrollmentListItem,
            UpdateEnrollmentStatusDto,
            StatusCount,
            GradeLevelCount,
            EnrollmentStats,
            TokenStatus,
            RegistrationToken,
            CreateTokenDto,
            RedeemTokenRequest,
            RedeemTokenResponse,
            TokenStatsResponse,
            ValidateCredentialRequest,
            ValidateCredentialResponse,
            InvalidateCredentialRequest,
            InvalidateCredentialResponse,
            IssuedCredential,
            CleanupResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Enrollments", description = "Student enrollment workflow"),
        (name = "Tokens", description = "Registration token lifecycle"),
        (name = "Credentials", description = "Temporary credential management")
    ),
    info(
        title = "Lumen API",
        version = "0.1.0",
        description = "Enrollment, registration token and temporary credential backend for the Lumen education platform.",
        contact(
            name = "API Support",
            email = "support@lumen.app"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "gateway_identity",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "x-user-id",
                    "Caller identity stamped by the API gateway \
                     (with x-organization-id for tenant scope)",
                ))),
            )
        }
    }
}
