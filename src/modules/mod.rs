//! Feature modules.
//!
//! Routed modules follow the controller/service/model/router split;
//! [`organizations`] and [`guardians`] are service-only collaborators
//! consumed by the enrollment workflow.

pub mod credentials;
pub mod enrollments;
pub mod guardians;
pub mod organizations;
pub mod tokens;
