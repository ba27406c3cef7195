use sqlx::PgPool;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::email::EmailConfig;
use crate::utils::email::EmailService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub email: EmailService,
    pub cors_config: CorsConfig,
}

pub async fn init_app_state() -> AppState {
    AppState {
        db: init_db_pool().await,
        email: EmailService::new(EmailConfig::from_env()),
        cors_config: CorsConfig::from_env(),
    }
}
