//! # configs
//!
//! Runtime settings for Pinwall, layered lowest priority first:
//! built-in defaults, an optional `pinwall.toml`, then `PINWALL__*` environment
//! variables (`__` separates nesting levels, e.g. `PINWALL__AUTH__JWT_SECRET`).

use chrono::Duration;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {0}: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    /// HS256 signing key for access and refresh tokens.
    pub jwt_secret: SecretString,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
}

impl AuthSettings {
    pub fn access_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_minutes)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_days)
    }
}

impl Settings {
    /// Reads `.env`, `pinwall.toml` and the process environment.
    pub fn load() -> Result<Self, ConfigsError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("loaded environment from {}", path.display());
        }

        let builder = Config::builder()
            .add_source(File::with_name("pinwall").required(false))
            .add_source(
                Environment::with_prefix("PINWALL")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::from_builder(builder)
    }

    /// Applies defaults to an arbitrary set of sources and validates the result.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigsError> {
        let settings: Settings = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("database.url", "sqlite:pinwall.db")?
            .set_default("database.max_connections", 5_i64)?
            .set_default("auth.access_token_minutes", 5_i64)?
            .set_default("auth.refresh_token_days", 1_i64)?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigsError> {
        if self.auth.jwt_secret.expose_secret().trim().is_empty() {
            return Err(ConfigsError::Invalid("auth.jwt_secret", "must not be empty".into()));
        }
        if self.auth.access_token_minutes <= 0 {
            return Err(ConfigsError::Invalid(
                "auth.access_token_minutes",
                "must be positive".into(),
            ));
        }
        if self.auth.refresh_token_days <= 0 {
            return Err(ConfigsError::Invalid(
                "auth.refresh_token_days",
                "must be positive".into(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigsError::Invalid(
                "database.max_connections",
                "must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_secret() -> ConfigBuilder<DefaultState> {
        Config::builder()
            .set_override("auth.jwt_secret", "s3cret")
            .unwrap()
    }

    #[test]
    fn defaults_fill_everything_but_the_secret() {
        let settings = Settings::from_builder(with_secret()).unwrap();

        assert_eq!(settings.bind_address(), ("127.0.0.1".to_string(), 8080));
        assert_eq!(settings.database.url, "sqlite:pinwall.db");
        assert_eq!(settings.auth.access_ttl(), Duration::minutes(5));
        assert_eq!(settings.auth.refresh_ttl(), Duration::days(1));
        assert_eq!(settings.auth.jwt_secret.expose_secret(), "s3cret");
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert!(matches!(
            Settings::from_builder(Config::builder()),
            Err(ConfigsError::Load(_))
        ));
    }

    #[test]
    fn overrides_win_over_defaults() {
        let builder = with_secret()
            .set_override("server.port", 9000_i64)
            .unwrap()
            .set_override("database.url", "sqlite::memory:")
            .unwrap();
        let settings = Settings::from_builder(builder).unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.database.url, "sqlite::memory:");
    }

    #[test]
    fn rejects_non_positive_ttl() {
        let builder = with_secret()
            .set_override("auth.access_token_minutes", 0_i64)
            .unwrap();
        assert!(matches!(
            Settings::from_builder(builder),
            Err(ConfigsError::Invalid("auth.access_token_minutes", _))
        ));
    }

    #[test]
    fn rejects_blank_secret() {
        let builder = Config::builder()
            .set_override("auth.jwt_secret", "  ")
            .unwrap();
        assert!(matches!(
            Settings::from_builder(builder),
            Err(ConfigsError::Invalid("auth.jwt_secret", _))
        ));
    }
}
