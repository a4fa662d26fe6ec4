//! Domain error taxonomy shared by every crate in the workspace.
//!
//! Each variant corresponds to one HTTP status class at the API boundary:
//! `NotFound` 404, `Validation` 400, `Conflict` and `InvalidTransition` 409,
//! `Unauthorized` 401, `Forbidden` and `EditLimitReached` 403, `Internal`
//! 500. Handlers construct these directly; the API crate owns the mapping.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Rejected input: bad dates, out-of-range hours or scores, unknown
    /// status/role names, disallowed file extensions.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request is well-formed but the current state refuses it:
    /// duplicate attachment or entry, lecturer at capacity, upload cap,
    /// finalizing before both evaluations are submitted.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An illegal attachment lifecycle transition, such as completing a
    /// pending attachment or reviving a cancelled one.
    #[error("Cannot transition attachment from '{from}' to '{to}'")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    /// A logbook entry that has used up its student edit allowance.
    #[error("This entry has reached the maximum number of edits ({max})")]
    EditLimitReached { max: i32 },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
