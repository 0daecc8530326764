use std::env;
use std::path::Path;
use thiserror::Error;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const DB_POOL_SIZE: &str = "DB_POOL_SIZE";
    /// HMAC secret used to sign and verify bearer tokens. Required.
    pub const JWT_KEY: &str = "JWT_KEY";
    pub const JWT_ISSUER: &str = "JWT_ISSUER";
    pub const JWT_AUDIENCE: &str = "JWT_AUDIENCE";
    pub const JWT_EXPIRE_MINUTES: &str = "JWT_EXPIRE_MINUTES";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATABASE_URL: &str = "./.db/notebooks.db";
    pub const DB_POOL_SIZE: u32 = 8;
    pub const JWT_ISSUER: &str = "notebooks-backend";
    pub const JWT_AUDIENCE: &str = "notebooks-clients";
    pub const JWT_EXPIRE_MINUTES: u64 = 60;
    /// HS256 wants at least as many key bytes as the digest size
    pub const JWT_MIN_KEY_BYTES: usize = 32;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{0} must be at least {min} bytes long", min = defaults::JWT_MIN_KEY_BYTES)]
    KeyTooShort(&'static str),
}

/// Bearer token settings
#[derive(Clone)]
pub struct JwtConfig {
    pub key: Vec<u8>,
    pub issuer: String,
    pub audience: String,
    pub expire_minutes: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("key", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expire_minutes", &self.expire_minutes)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub db_pool_size: u32,
    pub jwt: JwtConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(env_vars::JWT_KEY)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing(env_vars::JWT_KEY))?;
        if key.len() < defaults::JWT_MIN_KEY_BYTES {
            return Err(ConfigError::KeyTooShort(env_vars::JWT_KEY));
        }

        Ok(Self {
            port: parse_or(&lookup, env_vars::PORT, defaults::PORT)?,
            database_url: lookup(env_vars::DATABASE_URL)
                .unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            db_pool_size: parse_or(&lookup, env_vars::DB_POOL_SIZE, defaults::DB_POOL_SIZE)?,
            jwt: JwtConfig {
                key: key.into_bytes(),
                issuer: lookup(env_vars::JWT_ISSUER)
                    .unwrap_or_else(|| defaults::JWT_ISSUER.to_string()),
                audience: lookup(env_vars::JWT_AUDIENCE)
                    .unwrap_or_else(|| defaults::JWT_AUDIENCE.to_string()),
                expire_minutes: parse_or(
                    &lookup,
                    env_vars::JWT_EXPIRE_MINUTES,
                    defaults::JWT_EXPIRE_MINUTES,
                )?,
            },
        })
    }

    /// Directory holding the database file, if the url has one
    pub fn database_dir(&self) -> Option<&Path> {
        Path::new(&self.database_url)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
