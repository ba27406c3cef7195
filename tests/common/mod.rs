use lumen_api::utils::password::hash_password;
#[allow(unused_imports)]
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestOrganization {
    pub id: Uuid,
    pub name: String,
}

#[allow(dead_code)]
pub struct TestAdmin {
    pub id: Uuid,
    pub organization_id: Uuid,
}

pub async fn create_test_organization(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
) -> TestOrganization {
    let (id, name) = sqlx::query_as::<_, (Uuid, String)>(
        "INSERT INTO organizations (name, contact_email)
         VALUES ($1, $2)
         RETURNING id, name",
    )
    .bind(name)
    .bind("admin@test.org")
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestOrganization { id, name }
}

/// Admin user used as the acting identity behind the gateway headers.
pub async fn create_test_admin(
    tx: &mut Transaction<'_, Postgres>,
    organization_id: Uuid,
) -> TestAdmin {
    let hashed = hash_password("adminpass123").unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users
             (username, password, first_name, last_name, email, role,
              is_org_ward, is_active, organization_id)
         VALUES ($1, $2, 'Test', 'Admin', $3, 'ORG_ADMIN', FALSE, TRUE, $4)
         RETURNING id",
    )
    .bind(format!("admin-{}", Uuid::new_v4()))
    .bind(hashed)
    .bind(generate_unique_email())
    .bind(organization_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestAdmin {
        id,
        organization_id,
    }
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn generate_unique_org_name() -> String {
    format!("Test Organization {}", Uuid::new_v4())
}
