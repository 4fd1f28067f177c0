pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_RUST_LOG: &str = "info,ppwrify=debug,tower_http=info";
pub const DEFAULT_CORS_ORIGINS: &str = "*";

pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_MIN_IDLE: u32 = 1;

pub const DEFAULT_TOKEN_TTL_SECS: u64 = 12 * 60 * 60;
pub const DEFAULT_ADMIN_NAME: &str = "Administrator";
pub const MIN_ADMIN_PASSWORD_LEN: usize = 8;
