// API server configuration
//
// All settings come from environment variables (a `.env` file is loaded
// first when present). Without DATABASE_URL the server falls back to the
// in-memory dev backend.

use axum::http::HeaderValue;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9000";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Postgres URL; None selects the in-memory backend
    pub database_url: Option<String>,
    /// Force the in-memory backend even when DATABASE_URL is set
    pub dev_mode: bool,
    /// Run bundled migrations on startup (Postgres only)
    pub run_migrations: bool,
    pub bind_addr: String,
    /// Prefix for all /v1 routes, e.g. "/api"
    pub api_prefix: String,
    pub cors_origins: Vec<HeaderValue>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            dev_mode: false,
            run_migrations: true,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            api_prefix: String::new(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `DATABASE_URL`: Postgres connection string
    /// - `DEV_MODE`: "true" to use in-memory storage
    /// - `RUN_MIGRATIONS`: "false" to skip migrations (default: true)
    /// - `BIND_ADDR`: listen address (default: "0.0.0.0:9000")
    /// - `API_PREFIX`: route prefix (default: empty)
    /// - `CORS_ALLOWED_ORIGINS`: comma-separated origins (default: same-origin only)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            database_url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            dev_mode: lookup("DEV_MODE")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.dev_mode),
            run_migrations: lookup("RUN_MIGRATIONS")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.run_migrations),
            bind_addr: lookup("BIND_ADDR")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.bind_addr),
            api_prefix: lookup("API_PREFIX").unwrap_or_default(),
            cors_origins: lookup("CORS_ALLOWED_ORIGINS")
                .filter(|s| !s.is_empty())
                .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
                .unwrap_or_default(),
        }
    }

    /// Whether the in-memory backend should be used
    pub fn use_in_memory(&self) -> bool {
        self.dev_mode || self.database_url.is_none()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}
