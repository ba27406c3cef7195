//! Shared utilities for the Lumen API.
//!
//! - [`email`]: SMTP email sending for guardian credential delivery
//! - [`errors`]: Application error type and HTTP mapping
//! - [`password`]: Password hashing and verification
//! - [`temp_code`]: Temporary code and password generation

pub mod email;
pub mod errors;
pub mod password;
pub mod temp_code;
