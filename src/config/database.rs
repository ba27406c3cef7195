//! PostgreSQL connection pool initialization.
//!
//! The pool is created once at process start and injected into every
//! component through [`crate::state::AppState`]; nothing in the crate
//! reaches for an ambient global connection.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//!
//! # Panics
//!
//! [`init_db_pool`] panics if `DATABASE_URL` is unset or the connection
//! cannot be established, since the process cannot do anything useful
//! without a database.

use sqlx::PgPool;
use std::env;

/// Initialize the PostgreSQL connection pool from `DATABASE_URL`.
///
/// Call this once during startup; the returned pool is cheaply cloneable
/// and shared through the application state.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
