//! Application configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Secrets and editor access.
    #[serde(default)]
    pub security: SecurityConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Media storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Deployment environment name, reported by `/health`.
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Comma separated list of CORS origins.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Steady-state number of pooled connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// Extra connections allowed above `pool_size` under load.
    #[serde(default = "default_max_overflow")]
    pub max_overflow: u32,
    /// Maximum lifetime of a pooled connection, in seconds.
    #[serde(default = "default_pool_recycle")]
    pub pool_recycle_secs: u64,
}

/// Secrets.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Application secret.
    #[serde(default)]
    pub secret_key: String,
    /// Key expected in the `x-dev-editor-key` header.
    #[serde(default = "default_editor_key")]
    pub dev_editor_key: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Which storage backend serves media uploads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// No object store; uploads get a placeholder image URL.
    #[default]
    Placeholder,
    /// Files written below `base_path` and served under `base_url`.
    Local,
}

/// Media storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Selected backend.
    #[serde(default)]
    pub backend: StorageKind,
    /// Filesystem root for the local backend.
    #[serde(default = "default_storage_path")]
    pub base_path: PathBuf,
    /// Public URL prefix for the local backend.
    #[serde(default = "default_storage_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            allowed_origins: default_allowed_origins(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            dev_editor_key: default_editor_key(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageKind::default(),
            base_path: default_storage_path(),
            base_url: default_storage_url(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_allowed_origins() -> String {
    "http://localhost:3000".to_string()
}

const fn default_max_body_bytes() -> usize {
    20 * 1024 * 1024
}

const fn default_pool_size() -> u32 {
    5
}

const fn default_max_overflow() -> u32 {
    10
}

const fn default_pool_recycle() -> u64 {
    3600
}

fn default_editor_key() -> String {
    "dev-editor-key".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./files")
}

fn default_storage_url() -> String {
    "/files".to_string()
}

/// Flat environment variables accepted on top of the `HELPCENTER__` ones.
const FLAT_ENV: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.url"),
    ("DB_POOL_SIZE", "database.pool_size"),
    ("DB_MAX_OVERFLOW", "database.max_overflow"),
    ("DB_POOL_RECYCLE", "database.pool_recycle_secs"),
    ("SECRET_KEY", "security.secret_key"),
    ("DEV_EDITOR_KEY", "security.dev_editor_key"),
    ("ALLOWED_ORIGINS", "server.allowed_origins"),
    ("ENVIRONMENT", "server.environment"),
    ("PORT", "server.port"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
    ("STORAGE_BACKEND", "storage.backend"),
    ("STORAGE_PATH", "storage.base_path"),
    ("STORAGE_BASE_URL", "storage.base_url"),
];

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `HELPCENTER_ENV`)
    /// 4. Environment variables with `HELPCENTER__` prefix
    /// 5. Flat variables such as `DATABASE_URL` and `DEV_EDITOR_KEY`
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("HELPCENTER_ENV").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("HELPCENTER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in FLAT_ENV {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        builder.build()?.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("HELPCENTER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Configuration suitable for tests: placeholder storage, default keys.
    #[must_use]
    pub fn for_tests(database_url: impl Into<String>) -> Self {
        Self {
            server: ServerConfig {
                environment: "test".to_string(),
                ..ServerConfig::default()
            },
            database: DatabaseConfig {
                url: database_url.into(),
                pool_size: default_pool_size(),
                max_overflow: default_max_overflow(),
                pool_recycle_secs: default_pool_recycle(),
            },
            security: SecurityConfig::default(),
            logging: LoggingConfig::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Parsed CORS origins; blanks are dropped.
    #[must_use]
    pub fn allowed_origin_list(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

impl DatabaseConfig {
    /// Upper bound for the connection pool.
    #[must_use]
    pub const fn max_connections(&self) -> u32 {
        self.pool_size + self.max_overflow
    }
}

impl LoggingConfig {
    /// Whether log lines should be emitted as JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_origin_list() {
        let server = ServerConfig {
            allowed_origins: "http://localhost:3000, https://help.example.com,,".to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(
            server.allowed_origin_list(),
            vec!["http://localhost:3000", "https://help.example.com"]
        );
    }

    #[test]
    fn test_pool_bounds() {
        let config = Config::for_tests("postgres://localhost/test");
        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.database.max_connections(), 15);
        assert_eq!(config.security.dev_editor_key, "dev-editor-key");
    }

    #[test]
    fn test_storage_kind_deserialize() {
        let kind: StorageKind = serde_json::from_str(r#""local""#).unwrap();
        assert_eq!(kind, StorageKind::Local);
    }
}
