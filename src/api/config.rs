//! Application settings read from the environment.

/// Runtime settings.
///
/// All values have development defaults; `DATABASE_URL` is the switch
/// between PostgreSQL storage and the in-memory backend.
#[derive(Clone, Debug)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub host: [u8; 4],
    pub port: u16,
    pub database_url: Option<String>,
    pub cors_origins: Vec<String>,
}

impl Settings {
    /// Build settings from environment variables.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            app_name: "SafeReport".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            host: [0, 0, 0, 0],
            port,
            database_url: std::env::var("DATABASE_URL").ok(),
            cors_origins,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_env()
    }
}
