//! Runtime configuration
//! Mission: Collect process settings from flags and environment once, at startup

use clap::Parser;
use std::fmt;
use thiserror::Error;

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// One year. Keeps `iat + ttl` far from the timestamp range limits.
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Process configuration. Every flag can also be supplied through the
/// environment (a `.env` file is loaded first by the binary).
#[derive(Debug, Clone, Parser)]
#[command(name = "usuarios-api", about = "Authenticated REST API for user records")]
pub struct Config {
    /// HMAC secret used to sign and verify access tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// SQLite database file holding user records
    #[arg(long, env = "DATABASE_PATH", default_value = "usuarios.db")]
    pub database_path: String,

    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind_addr: String,

    /// Lifetime of issued tokens, in seconds
    #[arg(long, env = "TOKEN_TTL_SECS", default_value_t = 3600)]
    pub token_ttl_secs: i64,

    /// bcrypt work factor for stored secrets
    #[arg(long, env = "BCRYPT_COST", default_value_t = 10)]
    pub bcrypt_cost: u32,

    #[arg(long, env = "SEED_USER_ID", default_value_t = 1)]
    pub seed_user_id: i64,

    #[arg(long, env = "SEED_USER_EMAIL", default_value = "test@example.com")]
    pub seed_user_email: String,

    #[arg(
        long,
        env = "SEED_USER_PASSWORD",
        default_value = "123456",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub seed_user_password: String,

    #[arg(long, env = "SEED_USER_ROLE", default_value = "user")]
    pub seed_user_role: String,
}

impl Config {
    /// Resolve the signing secret. Absence is fatal for the process.
    pub fn signing_secret(&self) -> Result<SigningSecret, ConfigError> {
        SigningSecret::new(self.jwt_secret.clone().unwrap_or_default())
    }

    /// Check numeric settings that clap cannot range-check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.token_ttl_secs) {
            return Err(ConfigError::InvalidTokenTtl(self.token_ttl_secs));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidBcryptCost(self.bcrypt_cost));
        }
        Ok(())
    }
}

/// Symmetric key material for token signing. Never printed.
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfigError::SigningConfigurationMissing);
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET is not configured; refusing to start without a signing secret")]
    SigningConfigurationMissing,

    #[error("TOKEN_TTL_SECS must be between 1 and 31536000 (got {0})")]
    InvalidTokenTtl(i64),

    #[error("BCRYPT_COST must be between 4 and 31 (got {0})")]
    InvalidBcryptCost(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            jwt_secret: Some("unit-test-secret".to_string()),
            database_path: ":memory:".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            token_ttl_secs: 3600,
            bcrypt_cost: 4,
            seed_user_id: 1,
            seed_user_email: "test@example.com".to_string(),
            seed_user_password: "123456".to_string(),
            seed_user_role: "user".to_string(),
        }
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let mut config = base_config();
        config.jwt_secret = None;
        assert_eq!(
            config.signing_secret().unwrap_err(),
            ConfigError::SigningConfigurationMissing
        );

        config.jwt_secret = Some("   ".to_string());
        assert_eq!(
            config.signing_secret().unwrap_err(),
            ConfigError::SigningConfigurationMissing
        );
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let secret = SigningSecret::new("super-secret-value").unwrap();
        let printed = format!("{:?}", secret);
        assert!(!printed.contains("super-secret-value"));
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let mut config = base_config();
        assert!(config.validate().is_ok());

        config.token_ttl_secs = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTokenTtl(0)));

        config.token_ttl_secs = i64::MAX;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidTokenTtl(i64::MAX))
        );

        config.token_ttl_secs = MAX_TOKEN_TTL_SECS;
        assert!(config.validate().is_ok());
        config.token_ttl_secs = MAX_TOKEN_TTL_SECS + 1;
        assert!(config.validate().is_err());

        config.token_ttl_secs = 60;
        config.bcrypt_cost = 2;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBcryptCost(2)));
    }

    #[test]
    fn test_flags_parse() {
        let config = Config::try_parse_from([
            "usuarios-api",
            "--jwt-secret",
            "from-flag",
            "--token-ttl-secs",
            "120",
            "--bcrypt-cost",
            "4",
        ])
        .unwrap();

        assert_eq!(config.jwt_secret.as_deref(), Some("from-flag"));
        assert_eq!(config.token_ttl_secs, 120);
        assert_eq!(config.bcrypt_cost, 4);
    }
}
