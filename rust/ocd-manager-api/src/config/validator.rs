//! Startup validation of the loaded configuration.

use axum::http::HeaderValue;

use super::error::{ConfigResult, ConfigurationError};
use super::AppConfig;

/// Minimum length of the session signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 16;

/// Longest accepted session lifetime, in days.
pub const MAX_SESSION_DAYS: i64 = 3650;

/// Checks a loaded [`AppConfig`] and reports every problem at once.
#[derive(Debug)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the entire application configuration.
    pub fn validate(config: &AppConfig) -> ConfigResult<()> {
        let mut errors = Vec::new();

        match config.auth.jwt_secret.as_deref().map(str::trim) {
            None | Some("") => errors.push(ConfigurationError::missing_required(
                "auth.jwt_secret",
                "Signing and verifying session tokens",
                "JWT_SECRET",
            )),
            Some(secret) if secret.len() < MIN_SECRET_LEN => {
                errors.push(ConfigurationError::invalid(
                    format!("auth.jwt_secret is {} bytes long", secret.len()),
                    format!("Use a random secret of at least {MIN_SECRET_LEN} bytes"),
                ));
            }
            Some(_) => {}
        }

        if !(1..=MAX_SESSION_DAYS).contains(&config.auth.session_days) {
            errors.push(ConfigurationError::invalid(
                format!("auth.session_days is {}", config.auth.session_days),
                format!("Set OCD__AUTH__SESSION_DAYS between 1 and {MAX_SESSION_DAYS}"),
            ));
        }

        if config.auth.login_attempts_per_minute == 0 {
            errors.push(ConfigurationError::invalid(
                "auth.login_attempts_per_minute is 0",
                "Set OCD__AUTH__LOGIN_ATTEMPTS_PER_MINUTE to 1 or more",
            ));
        }

        if config.server.timeout_secs == 0 {
            errors.push(ConfigurationError::invalid(
                "server.timeout_secs is 0",
                "Set OCD__SERVER__TIMEOUT_SECS to 1 or more",
            ));
        }

        for origin in &config.server.cors_origins {
            let well_formed = (origin.starts_with("http://") || origin.starts_with("https://"))
                && HeaderValue::from_str(origin).is_ok();
            if !well_formed {
                errors.push(ConfigurationError::invalid(
                    format!("server.cors_origins contains '{origin}'"),
                    "List full origins such as https://app.example.com in OCD__SERVER__CORS_ORIGINS",
                ));
            }
        }

        if config.database.path.trim().is_empty() {
            errors.push(ConfigurationError::missing_required(
                "database.path",
                "Opening the record store",
                "DATABASE_URL (a file path or :memory:)",
            ));
        }

        ConfigurationError::collect(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("0123456789abcdef0123".into());
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(ConfigValidator::validate(&valid()).is_ok());
    }

    #[test]
    fn test_missing_secret() {
        let mut config = valid();
        config.auth.jwt_secret = None;
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingRequired { .. }));

        config.auth.jwt_secret = Some("   ".into());
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_short_secret() {
        let mut config = valid();
        config.auth.jwt_secret = Some("short".into());
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("at least 16 bytes"));
    }

    #[test]
    fn test_session_days_bounds() {
        let mut config = valid();
        config.auth.session_days = 1_000_000_000_000;
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("auth.session_days"));

        config.auth.session_days = MAX_SESSION_DAYS;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_cors_origins_must_be_origins() {
        let mut config = valid();
        config.server.cors_origins = vec!["http://localhost:5173".into()];
        assert!(ConfigValidator::validate(&config).is_ok());

        config.server.cors_origins = vec!["*".into()];
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("server.cors_origins"));
    }

    #[test]
    fn test_reports_all_problems() {
        let mut config = valid();
        config.auth.jwt_secret = None;
        config.auth.session_days = 0;
        config.server.timeout_secs = 0;
        config.database.path = String::new();

        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(err.count(), 4);
    }
}
