use chrono::Datelike;

use crate::auth::jwt::JwtConfig;

/// Default cap on report uploads per attachment.
const DEFAULT_REPORT_MAX_UPLOADS: i64 = 5;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Maximum report uploads per attachment (default: `5`).
    pub report_max_uploads: i64,
    /// Directory for stored report files (default: `uploads`).
    pub upload_dir: String,
    /// Academic year override. When unset, the current calendar year is used.
    pub academic_year: Option<i32>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `REPORT_MAX_UPLOADS`    | `5`                        |
    /// | `UPLOAD_DIR`            | `uploads`                  |
    /// | `ACADEMIC_YEAR`         | current calendar year      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let report_max_uploads: i64 = std::env::var("REPORT_MAX_UPLOADS")
            .unwrap_or_else(|_| DEFAULT_REPORT_MAX_UPLOADS.to_string())
            .parse()
            .expect("REPORT_MAX_UPLOADS must be a valid i64");

        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into());

        let academic_year = std::env::var("ACADEMIC_YEAR")
            .ok()
            .map(|y| y.parse().expect("ACADEMIC_YEAR must be a valid i32"));

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            report_max_uploads,
            upload_dir,
            academic_year,
        }
    }

    /// The academic year assignments and placement forms key on.
    pub fn current_academic_year(&self) -> i32 {
        self.academic_year
            .unwrap_or_else(|| chrono::Utc::now().year())
    }
}
