pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig};
pub use envconfig::EnvConfig;
