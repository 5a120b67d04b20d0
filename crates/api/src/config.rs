use showplay_core::catalog::DEFAULT_SEQUENCE_LIMIT;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum distinct sequences a show may sync (default: `200`).
    pub sequence_limit: usize,
    /// Optimistic save attempts per request before giving up (default: `3`).
    pub save_retry_limit: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8080`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SEQUENCE_LIMIT`       | `200`                      |
    /// | `SAVE_RETRY_LIMIT`     | `3`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
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

        let sequence_limit: usize = std::env::var("SEQUENCE_LIMIT")
            .map(|v| v.parse().expect("SEQUENCE_LIMIT must be a valid usize"))
            .unwrap_or(DEFAULT_SEQUENCE_LIMIT);

        let save_retry_limit: u32 = std::env::var("SAVE_RETRY_LIMIT")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("SAVE_RETRY_LIMIT must be a valid u32");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            sequence_limit,
            save_retry_limit,
        }
    }
}
