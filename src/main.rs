use dotenvy::dotenv;
use lumen_api::modules::credentials::service::CredentialService;
use lumen_api::modules::tokens::service::TokenService;
use lumen_api::router::init_router;
use lumen_api::state::init_app_state;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Expired credentials and tokens are swept hourly. Correctness does not
/// depend on the sweep; reads apply expiry lazily.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = init_app_state().await;

    let cleanup_db = state.db.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;

            match CredentialService::cleanup_expired(&cleanup_db).await {
                Ok(deleted) if deleted > 0 => {
                    info!(deleted, "Swept expired temporary credentials")
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e.error, "Credential cleanup sweep failed"),
            }

            match TokenService::cleanup_expired(&cleanup_db).await {
                Ok(expired) if expired > 0 => {
                    info!(expired, "Marked overdue registration tokens expired")
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e.error, "Token cleanup sweep failed"),
            }
        }
    });

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("🚀 Server running on http://localhost:3000");
    println!("📚 Swagger UI available at http://localhost:3000/swagger-ui");
    println!("📖 Scalar UI available at http://localhost:3000/scalar");
    axum::serve(listener, app).await.unwrap();
}
