use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::modules::credentials::service::CredentialService;
use crate::modules::enrollments::model::{
    BulkEnrollmentOutcome, BulkItemResult, EnrollmentFilterParams, EnrollmentItemDto,
    EnrollmentListItem, EnrollmentOutcome, EnrollmentStats, EnrollmentStatus, GradeLevelCount,
    StatusCount, StudentEnrollment,
};
use crate::modules::enrollments::validation::validate_enrollment_item;
use crate::modules::guardians::model::NewGuardian;
use crate::modules::guardians::service::GuardianService;
use crate::modules::organizations::service::OrganizationService;
use crate::utils::email::{EmailService, GuardianCredentialsEmail};
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;
use crate::utils::temp_code;

const MAX_BULK_ITEMS: usize = 500;

const ENROLLMENT_COLUMNS: &str = "id, organization_id, student_id, enrollment_status, \
     academic_year, grade_level, created_by, created_at, updated_at, deleted_at";

/// Everything created by one successful provisioning transaction, carried
/// out of the transaction so the notification step can run after commit.
struct Provisioned {
    enrollment_id: Uuid,
    user_id: Uuid,
    guardian_id: Uuid,
    temp_code: String,
    temp_password: String,
    expires_at: chrono::DateTime<chrono::Utc>,
    organization_name: String,
}

pub struct EnrollmentService;

impl EnrollmentService {
    /// Enroll a single student: validate, atomically provision the ward
    /// user + enrollment + guardian + temporary credential, then email the
    /// guardian. Never returns an error past this boundary; every failure
    /// mode comes back as a discriminated outcome.
    #[instrument(skip(db, mailer, item), fields(student = %item.student.full_name()))]
    pub async fn create_single_enrollment(
        db: &PgPool,
        mailer: &EmailService,
        organization_id: Uuid,
        actor_id: Uuid,
        item: &EnrollmentItemDto,
    ) -> EnrollmentOutcome {
        let errors = validate_enrollment_item(item);
        if !errors.is_empty() {
            return EnrollmentOutcome::failure("Validation failed", Some(errors));
        }

        let provisioned =
            match Self::provision(db, organization_id, actor_id, item).await {
                Ok(provisioned) => provisioned,
                Err(e) => {
                    warn!(error = %e.error, "Enrollment provisioning failed");
                    return EnrollmentOutcome::failure(e.error.to_string(), None);
                }
            };

        // Provisioning is committed; the email is best-effort and its
        // failure must not undo anything.
        let email = GuardianCredentialsEmail {
            guardian_name: item.guardian.full_name(),
            guardian_email: item.guardian.email.clone(),
            student_name: item.student.full_name(),
            temp_code: provisioned.temp_code.clone(),
            temp_password: provisioned.temp_password,
            organization_name: provisioned.organization_name,
            expiry_date: provisioned.expires_at,
        };

        let email_sent = match mailer.send_guardian_credentials(&email).await {
            Ok(sent) => sent,
            Err(e) => {
                warn!(error = %e.error, "Guardian credentials email failed");
                false
            }
        };

        info!(
            enrollment_id = %provisioned.enrollment_id,
            user_id = %provisioned.user_id,
            email_sent,
            "Student enrollment created"
        );

        EnrollmentOutcome {
            success: true,
            message: "Student enrollment created successfully".to_string(),
            enrollment_id: Some(provisioned.enrollment_id),
            user_id: Some(provisioned.user_id),
            guardian_id: Some(provisioned.guardian_id),
            temp_code: Some(provisioned.temp_code),
            errors: None,
            email_sent,
        }
    }

    /// The atomic provisioning block. Every step runs on one transaction;
    /// an error from any step rolls back all of them.
    async fn provision(
        db: &PgPool,
        organization_id: Uuid,
        actor_id: Uuid,
        item: &EnrollmentItemDto,
    ) -> Result<Provisioned, AppError> {
        let mut tx = db.begin().await.map_err(AppError::database)?;

        // Step 1: the organization must exist and not be soft-deleted.
        let organization =
            OrganizationService::get_organization(&mut *tx, organization_id).await?;

        // Step 2: ward user. The username is throwaway and the password
        // hash is random and never communicated; real access only ever
        // happens through the temporary credential.
        let username = Self::ward_username();
        let shadow_password = hash_password(&temp_code::generate_password(24))?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users
                 (username, password, first_name, last_name, email, phone, role,
                  is_org_ward, is_active, organization_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, 'ORG_WARD', TRUE, TRUE, $7, $8)
             RETURNING id",
        )
        .bind(&username)
        .bind(&shadow_password)
        .bind(&item.student.first_name)
        .bind(&item.student.last_name)
        .bind(&item.student.email)
        .bind(&item.student.phone)
        .bind(organization_id)
        .bind(actor_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::database)?;

        // Step 3: enrollment record, always starting PENDING.
        let enrollment_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO student_enrollments
                 (organization_id, student_id, enrollment_status, academic_year,
                  grade_level, created_by)
             VALUES ($1, $2, 'PENDING', $3, $4, $5)
             RETURNING id",
        )
        .bind(organization_id)
        .bind(user_id)
        .bind(&item.enrollment.academic_year)
        .bind(&item.enrollment.grade_level)
        .bind(actor_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::database)?;

        // Step 4: guardian record.
        let guardian = GuardianService::create_guardian(
            &mut *tx,
            NewGuardian {
                student_id: user_id,
                first_name: item.guardian.first_name.clone(),
                last_name: item.guardian.last_name.clone(),
                email: item.guardian.email.clone(),
                phone: item.guardian.phone.clone(),
                relation: item.guardian.relation.clone(),
                age: item.guardian.age,
            },
        )
        .await?;

        // Step 5: temporary credential for the new ward.
        let issued = CredentialService::issue(&mut *tx, user_id).await?;

        tx.commit().await.map_err(AppError::database)?;

        Ok(Provisioned {
            enrollment_id,
            user_id,
            guardian_id: guardian.id,
            temp_code: issued.temp_code,
            temp_password: issued.temp_password,
            expires_at: issued.expires_at,
            organization_name: organization.name,
        })
    }

    /// Run a batch of enrollment items through the orchestrator, one
    /// independent transaction per item. A failing item never aborts the
    /// batch or rolls back earlier successes; input order is preserved in
    /// the report.
    #[instrument(skip(db, mailer, items), fields(count = items.len()))]
    pub async fn process_bulk_enrollment(
        db: &PgPool,
        mailer: &EmailService,
        organization_id: Uuid,
        actor_id: Uuid,
        items: &[EnrollmentItemDto],
    ) -> Result<BulkEnrollmentOutcome, AppError> {
        if items.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Bulk enrollment requires at least one item"
            )));
        }
        if items.len() > MAX_BULK_ITEMS {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Bulk enrollment is limited to {} items per request",
                MAX_BULK_ITEMS
            )));
        }

        let mut results = Vec::with_capacity(items.len());
        let mut successful = 0;
        let mut failed = 0;

        for item in items {
            let outcome =
                Self::create_single_enrollment(db, mailer, organization_id, actor_id, item).await;

            if outcome.success {
                successful += 1;
            } else {
                failed += 1;
            }

            results.push(BulkItemResult {
                student_name: item.student.full_name(),
                success: outcome.success,
                message: outcome.message,
                enrollment_id: outcome.enrollment_id,
            });
        }

        info!(successful, failed, "Bulk enrollment complete");

        Ok(BulkEnrollmentOutcome {
            total_processed: items.len(),
            successful,
            failed,
            results,
        })
    }

    /// Enrollments for an organization with the ward's identity and primary
    /// guardian, newest first. Filters are fixed parameterized predicates.
    #[instrument(skip(db))]
    pub async fn get_enrollments(
        db: &PgPool,
        organization_id: Uuid,
        filters: &EnrollmentFilterParams,
    ) -> Result<Vec<EnrollmentListItem>, AppError> {
        let enrollments = sqlx::query_as::<_, EnrollmentListItem>(
            "SELECT se.id, se.organization_id, se.student_id, se.enrollment_status,
                    se.academic_year, se.grade_level, se.created_at,
                    u.first_name AS student_first_name, u.last_name AS student_last_name,
                    u.email AS student_email,
                    g.first_name AS guardian_first_name, g.last_name AS guardian_last_name,
                    g.email AS guardian_email, g.relation AS guardian_relation
             FROM student_enrollments se
             JOIN users u ON u.id = se.student_id
             LEFT JOIN LATERAL (
                 SELECT first_name, last_name, email, relation
                 FROM guardians
                 WHERE student_id = se.student_id
                 ORDER BY created_at ASC
                 LIMIT 1
             ) g ON TRUE
             WHERE se.organization_id = $1
               AND se.deleted_at IS NULL
               AND ($2::enrollment_status IS NULL OR se.enrollment_status = $2)
               AND ($3::text IS NULL OR se.academic_year = $3)
               AND ($4::text IS NULL OR se.grade_level = $4)
             ORDER BY se.created_at DESC",
        )
        .bind(organization_id)
        .bind(filters.status)
        .bind(&filters.academic_year)
        .bind(&filters.grade_level)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(enrollments)
    }

    #[instrument(skip(db))]
    pub async fn update_enrollment_status(
        db: &PgPool,
        organization_id: Uuid,
        enrollment_id: Uuid,
        status: EnrollmentStatus,
    ) -> Result<StudentEnrollment, AppError> {
        let enrollment = sqlx::query_as::<_, StudentEnrollment>(&format!(
            "UPDATE student_enrollments
             SET enrollment_status = $1, updated_at = NOW()
             WHERE id = $2 AND organization_id = $3 AND deleted_at IS NULL
             RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(status)
        .bind(enrollment_id)
        .bind(organization_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Enrollment not found")))?;

        Ok(enrollment)
    }

    /// Soft delete; the row stays for audit.
    #[instrument(skip(db))]
    pub async fn delete_enrollment(
        db: &PgPool,
        organization_id: Uuid,
        enrollment_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE student_enrollments
             SET deleted_at = NOW()
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL",
        )
        .bind(enrollment_id)
        .bind(organization_id)
        .execute(db)
        .await
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Enrollment not found or already deleted"
            )));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn enrollment_stats(
        db: &PgPool,
        organization_id: Uuid,
    ) -> Result<EnrollmentStats, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM student_enrollments
             WHERE organization_id = $1 AND deleted_at IS NULL",
        )
        .bind(organization_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        let by_status = sqlx::query_as::<_, StatusCount>(
            "SELECT enrollment_status AS status, COUNT(*) AS count
             FROM student_enrollments
             WHERE organization_id = $1 AND deleted_at IS NULL
             GROUP BY enrollment_status",
        )
        .bind(organization_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        let by_grade_level = sqlx::query_as::<_, GradeLevelCount>(
            "SELECT grade_level, COUNT(*) AS count
             FROM student_enrollments
             WHERE organization_id = $1 AND deleted_at IS NULL
             GROUP BY grade_level",
        )
        .bind(organization_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(EnrollmentStats {
            total,
            by_status,
            by_grade_level,
        })
    }

    fn ward_username() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect::<String>()
            .to_lowercase();

        format!("ward_{}_{}", Utc::now().timestamp_millis(), suffix)
    }
}
