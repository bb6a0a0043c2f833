//! Server configuration.

use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// JWT expiration in hours.
    pub jwt_expiration_hours: u64,
    /// Whether to create the admin account on an empty store.
    pub bootstrap_admin: bool,
    /// Bootstrap admin username.
    pub admin_username: String,
    /// Bootstrap admin password.
    pub admin_password: String,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("STUDYTRACK_JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("STUDYTRACK_JWT_SECRET is required"))?;

        Ok(Self {
            host: env::var("STUDYTRACK_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("STUDYTRACK_SERVER_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            jwt_secret,
            jwt_expiration_hours: env::var("STUDYTRACK_JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "720".to_string())
                .parse()
                .unwrap_or(720),
            bootstrap_admin: env::var("STUDYTRACK_BOOTSTRAP_ADMIN")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(true),
            admin_username: env::var("STUDYTRACK_ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("STUDYTRACK_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin123".to_string()),
            log_level: env::var("STUDYTRACK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
