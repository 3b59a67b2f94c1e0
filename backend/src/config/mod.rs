//! Central module for application-wide configuration settings.
//!
//! Configuration is read from a TOML file (path from `PM_CONFIG`, otherwise
//! `config.toml` when present) and then overridden by `PM_*` environment
//! variables. Every section has defaults, so an empty file is valid.

use std::env;
use std::path::{Path, PathBuf};

use adapters::{Argon2Config, PasswordPolicy};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub password: PasswordConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty disables the CORS layer.
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL, e.g. `sqlite://data/products.db` or `sqlite::memory:`.
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://product-management.db".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Lifetime of "remember me" cookies.
    pub remember_days: i64,
    /// Mark the cookie `Secure` (HTTPS only).
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "pm_session".to_string(),
            remember_days: 14,
            secure: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub policy: PasswordPolicy,
    /// Argon2 memory cost in KiB.
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let argon2 = Argon2Config::default();
        Self {
            policy: PasswordPolicy::default(),
            memory_cost: argon2.memory_cost,
            time_cost: argon2.time_cost,
            parallelism: argon2.parallelism,
        }
    }
}

impl PasswordConfig {
    pub fn argon2(&self) -> Argon2Config {
        Argon2Config {
            memory_cost: self.memory_cost,
            time_cost: self.time_cost,
            parallelism: self.parallelism,
        }
    }
}

/// Bootstrap SuperAdmin account, created on startup when both fields are set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub super_admin_email: Option<String>,
    pub super_admin_password: Option<String>,
}

impl AppConfig {
    /// Loads the file named by `PM_CONFIG` (or `config.toml` if it exists)
    /// and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = env::var("PM_CONFIG").ok().map(PathBuf::from);
        let path = explicit.or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            default.exists().then_some(default)
        });

        let mut config = match path {
            Some(path) => {
                info!(path = %path.display(), "loading configuration file");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `PM_*` overrides looked up through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("PM_HTTP_HOST") {
            self.http.host = host;
        }
        if let Some(port) = lookup("PM_HTTP_PORT").and_then(|v| v.parse().ok()) {
            self.http.port = port;
        }
        if let Some(url) = lookup("PM_DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(name) = lookup("PM_SESSION_COOKIE") {
            self.session.cookie_name = name;
        }
        if let Some(email) = lookup("PM_SEED_SUPER_ADMIN_EMAIL") {
            self.seed.super_admin_email = Some(email);
        }
        if let Some(password) = lookup("PM_SEED_SUPER_ADMIN_PASSWORD") {
            self.seed.super_admin_password = Some(password);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url must not be empty".into()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid("database.max_connections must be at least 1".into()));
        }
        if self.session.cookie_name.trim().is_empty() {
            return Err(ConfigError::Invalid("session.cookie_name must not be empty".into()));
        }
        if self.session.remember_days <= 0 {
            return Err(ConfigError::Invalid("session.remember_days must be positive".into()));
        }
        if self.seed.super_admin_email.is_some() != self.seed.super_admin_password.is_some() {
            return Err(ConfigError::Invalid(
                "seed.super_admin_email and seed.super_admin_password must be set together".into(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }
}
