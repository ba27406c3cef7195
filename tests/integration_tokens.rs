mod common;

use axum::http::StatusCode;
use common::{create_test_admin, create_test_organization, generate_unique_org_name};
use lumen_api::modules::tokens::model::{CreateTokenDto, TokenStatus};
use lumen_api::modules::tokens::service::TokenService;
use sqlx::PgPool;
use uuid::Uuid;

async fn setup_org(pool: &PgPool) -> (Uuid, Uuid) {
    let mut tx = pool.begin().await.unwrap();
    let org = create_test_organization(&mut tx, &generate_unique_org_name()).await;
    let admin = create_test_admin(&mut tx, org.id).await;
    tx.commit().await.unwrap();
    (org.id, admin.id)
}

fn token_dto(max_uses: Option<i32>) -> CreateTokenDto {
    CreateTokenDto {
        student_name: Some("Ama Boateng".to_string()),
        student_email: Some("ama@example.com".to_string()),
        max_uses,
        expires_in_days: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_token_defaults(pool: PgPool) {
    let (org_id, admin_id) = setup_org(&pool).await;

    let token = TokenService::create_token(&pool, org_id, admin_id, token_dto(None))
        .await
        .unwrap();

    assert!(token.token.starts_with("lumreg-"));
    assert_eq!(token.status, TokenStatus::Active);
    assert_eq!(token.max_uses, 1);
    assert_eq!(token.current_uses, 0);
    assert!(token.used_at.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_token_requires_existing_organization(pool: PgPool) {
    let (_, admin_id) = setup_org(&pool).await;

    let err = TokenService::create_token(&pool, Uuid::new_v4(), admin_id, token_dto(None))
        .await
        .unwrap_err();

    assert_eq!(err.status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_single_use_redemption_exhausts_token(pool: PgPool) {
    let (org_id, admin_id) = setup_org(&pool).await;
    let token = TokenService::create_token(&pool, org_id, admin_id, token_dto(None))
        .await
        .unwrap();

    let redeemed = TokenService::redeem(&pool, &token.token).await.unwrap();
    assert_eq!(redeemed.organization_id, org_id);
    assert_eq!(redeemed.remaining_uses, 0);
    assert_eq!(redeemed.student_name.as_deref(), Some("Ama Boateng"));

    let err = TokenService::redeem(&pool, &token.token).await.unwrap_err();
    assert_eq!(err.status, StatusCode::CONFLICT);

    let tokens = TokenService::list_tokens(&pool, org_id, Some(TokenStatus::Used))
        .await
        .unwrap();
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].used_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_multi_use_token_counts_down(pool: PgPool) {
    let (org_id, admin_id) = setup_org(&pool).await;
    let token = TokenService::create_token(&pool, org_id, admin_id, token_dto(Some(3)))
        .await
        .unwrap();

    let first = TokenService::redeem(&pool, &token.token).await.unwrap();
    assert_eq!(first.remaining_uses, 2);

    let second = TokenService::redeem(&pool, &token.token).await.unwrap();
    assert_eq!(second.remaining_uses, 1);

    let active = TokenService::list_tokens(&pool, org_id, Some(TokenStatus::Active))
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].current_uses, 2);

    let third = TokenService::redeem(&pool, &token.token).await.unwrap();
    assert_eq!(third.remaining_uses, 0);

    let err = TokenService::redeem(&pool, &token.token).await.unwrap_err();
    assert_eq!(err.status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_redemption_consumes_exactly_once(pool: PgPool) {
    let (org_id, admin_id) = setup_org(&pool).await;
    let token = TokenService::create_token(&pool, org_id, admin_id, token_dto(None))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let pool = pool.clone();
        let token_string = token.token.clone();
        handles.push(tokio::spawn(async move {
            TokenService::redeem(&pool, &token_string).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 1);

    let used = TokenService::list_tokens(&pool, org_id, Some(TokenStatus::Used))
        .await
        .unwrap();
    assert_eq!(used.len(), 1);
    assert_eq!(used[0].current_uses, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_token_fails_and_is_rewritten(pool: PgPool) {
    let (org_id, admin_id) = setup_org(&pool).await;
    let token = TokenService::create_token(&pool, org_id, admin_id, token_dto(None))
        .await
        .unwrap();

    sqlx::query("UPDATE registration_tokens SET expires_at = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(token.id)
        .execute(&pool)
        .await
        .unwrap();

    let err = TokenService::redeem(&pool, &token.token).await.unwrap_err();
    assert_eq!(err.status, StatusCode::CONFLICT);

    // The lazily observed expiry was written back.
    let expired = TokenService::list_tokens(&pool, org_id, Some(TokenStatus::Expired))
        .await
        .unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].current_uses, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_revoked_token_cannot_be_redeemed(pool: PgPool) {
    let (org_id, admin_id) = setup_org(&pool).await;
    let token = TokenService::create_token(&pool, org_id, admin_id, token_dto(Some(5)))
        .await
        .unwrap();

    let revoked = TokenService::revoke(&pool, org_id, token.id).await.unwrap();
    assert_eq!(revoked.status, TokenStatus::Revoked);

    let err = TokenService::redeem(&pool, &token.token).await.unwrap_err();
    assert_eq!(err.status, StatusCode::CONFLICT);

    // Redemption against a revoked token changes nothing.
    let tokens = TokenService::list_tokens(&pool, org_id, None).await.unwrap();
    assert_eq!(tokens[0].current_uses, 0);
    assert_eq!(tokens[0].status, TokenStatus::Revoked);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_revoke_is_not_repeatable(pool: PgPool) {
    let (org_id, admin_id) = setup_org(&pool).await;
    let token = TokenService::create_token(&pool, org_id, admin_id, token_dto(None))
        .await
        .unwrap();

    TokenService::revoke(&pool, org_id, token.id).await.unwrap();

    let err = TokenService::revoke(&pool, org_id, token.id).await.unwrap_err();
    assert_eq!(err.status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_revoke_is_tenant_scoped(pool: PgPool) {
    let (org_id, admin_id) = setup_org(&pool).await;
    let (other_org_id, _) = setup_org(&pool).await;
    let token = TokenService::create_token(&pool, org_id, admin_id, token_dto(None))
        .await
        .unwrap();

    let err = TokenService::revoke(&pool, other_org_id, token.id).await.unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stats_count_overdue_active_as_expired(pool: PgPool) {
    let (org_id, admin_id) = setup_org(&pool).await;

    TokenService::create_token(&pool, org_id, admin_id, token_dto(None))
        .await
        .unwrap();
    let overdue = TokenService::create_token(&pool, org_id, admin_id, token_dto(None))
        .await
        .unwrap();
    let used = TokenService::create_token(&pool, org_id, admin_id, token_dto(None))
        .await
        .unwrap();

    sqlx::query("UPDATE registration_tokens SET expires_at = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(overdue.id)
        .execute(&pool)
        .await
        .unwrap();
    TokenService::redeem(&pool, &used.token).await.unwrap();

    let stats = TokenService::token_stats(&pool, org_id).await.unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.active, 1);
    assert_eq!(stats.used, 1);
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.revoked, 0);

    // Cleanup rewrites the overdue row; the stats stay the same.
    let rewritten = TokenService::cleanup_expired(&pool).await.unwrap();
    assert_eq!(rewritten, 1);

    let stats = TokenService::token_stats(&pool, org_id).await.unwrap();
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.active, 1);
}
