//! # Lumen API
//!
//! Backend service for the Lumen education platform covering the student
//! enrollment workflow: guardian-driven enrollment, organization-issued
//! registration tokens and short-lived temporary credentials.
//!
//! ## Overview
//!
//! - **Enrollment**: single and bulk student enrollment, atomically
//!   provisioning a ward user account, the enrollment record, a guardian
//!   record and a temporary credential in one transaction per student
//! - **Registration Tokens**: opaque `lumreg-` tokens an organization hands
//!   out for self-service registration, with multi-use counting, expiry and
//!   revocation
//! - **Temporary Credentials**: `lumtempcode-` username plus generated
//!   password pairs emailed to guardians, valid for five days and consumed
//!   on first real login
//! - **Multi-tenancy**: every query is scoped to the caller's organization;
//!   identity arrives via gateway-stamped headers
//!
//! ## Architecture
//!
//! The codebase follows a modular architecture inspired by NestJS:
//!
//! ```text
//! src/
//! ├── config/           # Configuration modules (database, CORS, email)
//! ├── middleware/       # Gateway identity extractor
//! ├── modules/          # Feature modules
//! │   ├── enrollments/ # Enrollment orchestration and bulk runner
//! │   ├── tokens/      # Registration token lifecycle
//! │   ├── credentials/ # Temporary credential issue/validate/invalidate
//! │   ├── guardians/   # Guardian records
//! │   └── organizations/ # Organization lookup
//! └── utils/            # Shared utilities (errors, email, codec)
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `model.rs`: Data models, DTOs, database structs
//! - `router.rs`: Axum router configuration
//!
//! ## API Documentation
//!
//! When the server is running, API documentation is available at:
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`
//!
//! ## Security Considerations
//!
//! - Temporary passwords are bcrypt-hashed at rest; the plaintext exists
//!   only in the issuing response and the guardian email
//! - Authentication is terminated at the gateway; this service trusts the
//!   `x-user-id` / `x-organization-id` headers it stamps
//! - Ward accounts carry a random shadow password that is never
//!   communicated; access starts from the temporary credential

pub mod config;
pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;
