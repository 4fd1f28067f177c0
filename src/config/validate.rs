use anyhow::{Result, bail};

use super::{AppConfig, defaults::MIN_ADMIN_PASSWORD_LEN};

/// Checks every section and reports all problems in one error.
pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut problems: Vec<String> = Vec::new();

    if cfg.server.host.trim().is_empty() {
        problems.push("server.host must not be empty".to_string());
    }
    if let Some(origins) = cfg.server.allowed_origins() {
        for origin in origins {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                problems.push(format!("server.cors_origins entry `{origin}` is not an http(s) origin"));
            }
        }
    }

    if let Some(database) = &cfg.database {
        if database.url.trim().is_empty() {
            problems.push("database.url must not be empty".to_string());
        }
        if database.max_connections == 0 {
            problems.push("database.max_connections must be > 0".to_string());
        }
        if database.min_idle > database.max_connections {
            problems.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(auth) = &cfg.auth {
        if auth.jwt_secret.trim().is_empty() {
            problems.push("auth.jwt_secret must not be empty".to_string());
        }
        if auth.token_ttl_secs == 0 {
            problems.push("auth.token_ttl_secs must be > 0".to_string());
        }
        if !auth.admin_email.contains('@') {
            problems.push("auth.admin_email must be an email address".to_string());
        }
        if auth.admin_password.chars().count() < MIN_ADMIN_PASSWORD_LEN {
            problems.push(format!(
                "auth.admin_password must be at least {MIN_ADMIN_PASSWORD_LEN} characters"
            ));
        }
    }

    if problems.is_empty() {
        return Ok(());
    }
    bail!("invalid configuration:\n- {}", problems.join("\n- "))
}
