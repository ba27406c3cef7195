use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(
    Serialize, Deserialize, sqlx::Type, Debug, Clone, Copy, PartialEq, Eq, ToSchema,
)]
#[sqlx(type_name = "enrollment_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum EnrollmentStatus {
    Pending,
    Active,
    Inactive,
    Graduated,
    Transferred,
    Withdrawn,
}

/// A student enrollment row. Soft-deleted, never hard-deleted.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct StudentEnrollment {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub student_id: Uuid,
    pub enrollment_status: EnrollmentStatus,
    pub academic_year: String,
    pub grade_level: String,
    pub created_by: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Student identity/contact fields of an enrollment item.
#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct StudentDetailsDto {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub gender: Option<String>,
}

impl StudentDetailsDto {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Guardian fields of an enrollment item.
#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct GuardianDetailsDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub relation: String,
    pub age: Option<i32>,
}

impl GuardianDetailsDto {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Enrollment placement fields of an enrollment item.
#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct EnrollmentDetailsDto {
    pub grade_level: String,
    /// Format `NNNN-NNNN`, e.g. `2024-2025`.
    pub academic_year: String,
}

/// One student + guardian + placement bundle, the unit of both single and
/// bulk enrollment.
#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct EnrollmentItemDto {
    pub student: StudentDetailsDto,
    pub guardian: GuardianDetailsDto,
    pub enrollment: EnrollmentDetailsDto,
}

/// Discriminated result of a single enrollment. The orchestrator never
/// throws past its boundary; failures come back through this shape so
/// single and bulk callers can treat every call uniformly.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct EnrollmentOutcome {
    pub success: bool,
    pub message: String,
    pub enrollment_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub guardian_id: Option<Uuid>,
    /// Plaintext temp code; the password is only ever delivered by email.
    pub temp_code: Option<String>,
    /// Per-field validation messages when validation rejected the item.
    pub errors: Option<Vec<String>>,
    /// Whether the guardian-credentials email was confirmed handed off.
    /// Provisioning is durable either way.
    pub email_sent: bool,
}

impl EnrollmentOutcome {
    pub fn failure(message: impl Into<String>, errors: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            message: message.into(),
            enrollment_id: None,
            user_id: None,
            guardian_id: None,
            temp_code: None,
            errors,
            email_sent: false,
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct BulkEnrollmentRequest {
    pub items: Vec<EnrollmentItemDto>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct BulkItemResult {
    pub student_name: String,
    pub success: bool,
    pub message: String,
    pub enrollment_id: Option<Uuid>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct BulkEnrollmentOutcome {
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<BulkItemResult>,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct EnrollmentFilterParams {
    pub status: Option<EnrollmentStatus>,
    pub academic_year: Option<String>,
    pub grade_level: Option<String>,
}

/// Enrollment joined with the ward's identity and the primary guardian
/// (earliest-created) for listing.
#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct EnrollmentListItem {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub student_id: Uuid,
    pub enrollment_status: EnrollmentStatus,
    pub academic_year: String,
    pub grade_level: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub student_first_name: String,
    pub student_last_name: String,
    pub student_email: Option<String>,
    pub guardian_first_name: Option<String>,
    pub guardian_last_name: Option<String>,
    pub guardian_email: Option<String>,
    pub guardian_relation: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct UpdateEnrollmentStatusDto {
    pub status: EnrollmentStatus,
}

#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct StatusCount {
    pub status: EnrollmentStatus,
    pub count: i64,
}

#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct GradeLevelCount {
    pub grade_level: String,
    pub count: i64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct EnrollmentStats {
    pub total: i64,
    pub by_status: Vec<StatusCount>,
    pub by_grade_level: Vec<GradeLevelCount>,
}
