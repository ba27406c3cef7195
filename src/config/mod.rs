//! Configuration modules for the Lumen API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables with sensible development defaults.
//!
//! - [`cors`]: CORS allowed origins
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`email`]: SMTP configuration for credential delivery emails

pub mod cors;
pub mod database;
pub mod email;
