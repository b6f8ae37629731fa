use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CrmError;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "CRM_";

/// Runtime configuration, layered as defaults -> `config.toml` -> `CRM_*` env vars.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:crm.db".to_string(),
            loglevel: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub password_scheme: PasswordScheme,
    pub insecure_cookie: bool,
    /// Sessions expire after this many hours without a request.
    pub session_max_age_hours: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_scheme: PasswordScheme::default(),
            insecure_cookie: false,
            session_max_age_hours: 24,
        }
    }
}

/// Scheme used to hash passwords on register. Verification accepts both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    #[default]
    Argon2,
    /// Unsalted SHA-256 hex digest, compatible with databases written by the legacy app.
    Sha256,
}

impl Config {
    /// Load from the default `config.toml` (if present) and the environment.
    pub fn load() -> Result<Self, CrmError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, CrmError> {
        let cfg = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(cfg)
    }
}
