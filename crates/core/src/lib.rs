//! Domain logic for the intrack attachment-tracking platform.
//!
//! Everything in this crate is pure: no database, no HTTP, no clock other
//! than dates passed in by callers. The API and DB crates build on these
//! types and functions.

pub mod assignment;
pub mod attachment;
pub mod error;
pub mod export;
pub mod grading;
pub mod logbook;
pub mod reports;
pub mod roles;
pub mod types;

pub use error::CoreError;
pub use roles::Role;
