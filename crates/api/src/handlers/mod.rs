//! HTTP request handlers, grouped by resource.

pub mod accounts;
pub mod admin;
pub mod attachments;
pub mod auth;
pub mod departments;
pub mod evaluations;
pub mod exports;
pub mod lecturer;
pub mod logbook;
pub mod placements;
pub mod reports;
