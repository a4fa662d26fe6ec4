use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: intrack_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<intrack_events::EventBus>,
    /// Whether an email notifier is attached to the bus. Handlers that
    /// normally deliver credentials by email surface them in the response
    /// with a warning when this is false.
    pub email_enabled: bool,
}
