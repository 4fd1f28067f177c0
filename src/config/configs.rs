use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

/// Server settings. `database` and `auth` stay optional so partial configs
/// (tests, tooling) still load; the binary requires both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: Option<DatabaseConfig>,
    pub auth: Option<AuthConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }

    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        <Self as EnvConfig>::from_vars(vars)
    }
}

impl EnvConfig for AppConfig {
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated browser origins allowed by CORS; `*` allows any.
    pub cors_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT,
            cors_origins: defaults::DEFAULT_CORS_ORIGINS.to_string(),
        }
    }
}

impl ServerConfig {
    /// Listed origins, or `None` when any origin is allowed.
    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            return None;
        }
        Some(origins)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "DatabaseConfig::default_min_idle")]
    pub min_idle: u32,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        defaults::DEFAULT_DB_MAX_CONNECTIONS
    }

    fn default_min_idle() -> u32 {
        defaults::DEFAULT_DB_MIN_IDLE
    }
}

/// Token signing plus the administrator account seeded at start-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "AuthConfig::default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    pub admin_email: String,
    pub admin_password: String,
    #[serde(default = "AuthConfig::default_admin_name")]
    pub admin_name: String,
}

impl AuthConfig {
    fn default_token_ttl_secs() -> u64 {
        defaults::DEFAULT_TOKEN_TTL_SECS
    }

    fn default_admin_name() -> String {
        defaults::DEFAULT_ADMIN_NAME.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ServerConfig};

    #[test]
    fn nested_sections_come_from_prefixed_vars() {
        let cfg = AppConfig::from_vars([
            ("APP_SERVER__PORT", "8080"),
            ("APP_DATABASE__URL", "sqlite::memory:"),
            ("APP_AUTH__JWT_SECRET", "secret"),
            ("APP_AUTH__ADMIN_EMAIL", "admin@ppwrify.local"),
            ("APP_AUTH__ADMIN_PASSWORD", "admin12345"),
        ])
        .expect("config should load");

        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        let database = cfg.database.expect("database section");
        assert_eq!(database.url, "sqlite::memory:");
        assert_eq!(database.max_connections, 10);
        let auth = cfg.auth.expect("auth section");
        assert_eq!(auth.admin_name, "Administrator");
        assert_eq!(auth.token_ttl_secs, 12 * 60 * 60);
    }

    #[test]
    fn missing_sections_stay_empty() {
        let cfg = AppConfig::from_vars(Vec::<(String, String)>::new()).expect("config should load");
        assert!(cfg.database.is_none());
        assert!(cfg.auth.is_none());
    }

    #[test]
    fn validation_runs_on_load() {
        let err = AppConfig::from_vars([
            ("APP_AUTH__JWT_SECRET", "secret"),
            ("APP_AUTH__ADMIN_EMAIL", "admin@ppwrify.local"),
            ("APP_AUTH__ADMIN_PASSWORD", "short"),
        ])
        .expect_err("short admin password should be rejected");
        assert!(err.to_string().contains("auth.admin_password"));
    }

    #[test]
    fn cors_origins_parse() {
        let any = ServerConfig::default();
        assert_eq!(any.allowed_origins(), None);

        let listed = ServerConfig {
            cors_origins: "http://localhost:5173, https://app.ppwrify.example,".to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(
            listed.allowed_origins(),
            Some(vec![
                "http://localhost:5173".to_string(),
                "https://app.ppwrify.example".to_string()
            ])
        );
    }
}
