use std::{collections::HashMap, path::Path};

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// A config struct read from `APP_`-prefixed variables, sections split on
/// `__`: `APP_DATABASE__URL` lands in `database.url`.
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Reads the process environment after loading `.env`, if any.
    fn from_env() -> Result<Self> {
        let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        if dotenvy::from_filename(&manifest_env).is_err() {
            dotenvy::dotenv().ok();
        }
        Self::load(None)
    }

    /// Reads `vars` instead of the process environment.
    fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<HashMap<String, String>>) -> Result<Self> {
        let environment = config_rs::Environment::with_prefix(Self::PREFIX)
            .prefix_separator("_")
            .separator(Self::SEPARATOR)
            .try_parsing(true)
            .source(vars);

        let cfg = config_rs::Config::builder()
            .add_source(environment)
            .build()
            .context("reading config variables")?
            .try_deserialize::<Self>()
            .context("config variables do not match the expected shape")?;

        cfg.validate()?;
        Ok(cfg)
    }
}
