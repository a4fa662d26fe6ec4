//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated account from a JWT Bearer token.
//! - [`rbac::RequireStudent`] -- Requires the `student` role.
//! - [`rbac::RequireSupervisor`] -- Requires the `supervisor` role.
//! - [`rbac::RequireLecturer`] -- Requires the `lecturer` role.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireAuth`] -- Requires any authenticated account.

pub mod auth;
pub mod rbac;
