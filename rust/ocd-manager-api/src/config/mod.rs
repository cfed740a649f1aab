//! Configuration management for the OCD Manager API.
//!
//! Configuration is layered: built-in defaults, an optional
//! `config/ocd-manager.{toml,yaml,json}` file, `OCD__`-prefixed environment
//! variables, and finally a handful of well-known variables (`JWT_SECRET`,
//! `DATABASE_URL`).
//!
//! ```rust,ignore
//! use ocd_manager_api::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! ```

pub mod error;
pub mod validator;

pub use error::{ConfigResult, ConfigurationError};
pub use validator::ConfigValidator;

use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Session and credential configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Record store configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment, then validate it.
    ///
    /// Use [`Self::load_unchecked`] to skip validation.
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::load_unchecked()?;

        ConfigValidator::validate(&config)
            .map_err(|e| anyhow::anyhow!("Configuration validation failed:\n\n{e}"))?;

        Ok(config)
    }

    /// Load configuration without validation.
    pub fn load_unchecked() -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("database.path", default_database_path())?
            .add_source(config::File::with_name("config/ocd-manager").required(false))
            .add_source(
                config::Environment::with_prefix("OCD")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            app_config.auth.jwt_secret = Some(secret);
        }
        if let Ok(path) = std::env::var("DATABASE_URL") {
            app_config.database.path = path;
        }

        Ok(app_config)
    }

    /// Socket address string the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// API port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Directory with the front-end bundle, served behind the page guard.
    #[serde(default)]
    pub static_dir: Option<String>,
    /// Origins allowed to call the API with the session cookie. Empty means
    /// same-origin only.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_secs: default_timeout(),
            static_dir: None,
            cors_origins: Vec::new(),
        }
    }
}

/// Session and credential configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret.
    pub jwt_secret: Option<String>,
    /// Session lifetime in days.
    #[serde(default = "default_session_days")]
    pub session_days: i64,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Mark the session cookie `Secure`.
    #[serde(default)]
    pub secure_cookies: bool,
    /// Login/register attempts allowed per email per minute.
    #[serde(default = "default_login_attempts")]
    pub login_attempts_per_minute: u32,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("session_days", &self.session_days)
            .field("cookie_name", &self.cookie_name)
            .field("secure_cookies", &self.secure_cookies)
            .field("login_attempts_per_minute", &self.login_attempts_per_minute)
            .finish()
    }
}

fn default_session_days() -> i64 {
    7
}

fn default_cookie_name() -> String {
    "ocd-session".to_string()
}

fn default_login_attempts() -> u32 {
    10
}

impl AuthConfig {
    /// Signing secret, empty when unset. Startup validation rejects that case.
    pub fn secret(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or_default()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            session_days: default_session_days(),
            cookie_name: default_cookie_name(),
            secure_cookies: false,
            login_attempts_per_minute: default_login_attempts(),
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub path: String,
}

fn default_database_path() -> String {
    "./data/ocd-manager.sqlite".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to use JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
