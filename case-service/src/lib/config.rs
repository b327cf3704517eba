use std::env;

use auth::TokenConfig;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub token: TokenSettings,
    #[serde(default)]
    pub password: PasswordSettings,
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        5
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct TokenSettings {
    pub secret: String,
    #[serde(default = "TokenSettings::default_expiration_minutes")]
    pub expiration_minutes: i64,
}

impl TokenSettings {
    fn default_expiration_minutes() -> i64 {
        TokenConfig::DEFAULT_TTL_MINUTES
    }

    /// One year.
    pub const MAX_EXPIRATION_MINUTES: i64 = 60 * 24 * 365;

    /// # Errors
    /// `expiration_minutes` outside `1..=MAX_EXPIRATION_MINUTES`.
    pub fn to_token_config(&self) -> Result<TokenConfig, ConfigError> {
        if !(1..=Self::MAX_EXPIRATION_MINUTES).contains(&self.expiration_minutes) {
            return Err(ConfigError::Message(format!(
                "token.expiration_minutes must be between 1 and {}, got {}",
                Self::MAX_EXPIRATION_MINUTES,
                self.expiration_minutes
            )));
        }

        Ok(TokenConfig::new(self.secret.as_bytes())
            .with_ttl(Duration::minutes(self.expiration_minutes)))
    }
}

// Keeps the signing secret out of logs.
impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

/// Argon2 cost. Unset fields fall back to the Argon2id defaults.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PasswordSettings {
    pub memory_kib: Option<u32>,
    pub iterations: Option<u32>,
    pub parallelism: Option<u32>,
}

impl PasswordSettings {
    pub fn to_hasher(&self) -> Result<auth::PasswordHasher, auth::PasswordError> {
        if self.memory_kib.is_none() && self.iterations.is_none() && self.parallelism.is_none() {
            return Ok(auth::PasswordHasher::new());
        }

        let defaults = argon2_defaults();
        auth::PasswordHasher::with_params(
            self.memory_kib.unwrap_or(defaults.0),
            self.iterations.unwrap_or(defaults.1),
            self.parallelism.unwrap_or(defaults.2),
        )
    }
}

// Argon2id defaults of the argon2 0.5 crate (m=19 MiB, t=2, p=1).
fn argon2_defaults() -> (u32, u32, u32) {
    (19 * 1024, 2, 1)
}

/// First administrator, created at startup when no identity has its username.
#[derive(Deserialize, Clone)]
pub struct BootstrapAdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdminConfig")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, TOKEN__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: TOKEN__SECRET=... overrides token.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_settings_debug_redacts_secret() {
        let settings = TokenSettings {
            secret: "super-secret-value".to_string(),
            expiration_minutes: 30,
        };

        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_token_settings_to_config() {
        let settings = TokenSettings {
            secret: "secret_key_at_least_32_bytes_long!".to_string(),
            expiration_minutes: 45,
        };

        let config = settings.to_token_config().unwrap();
        assert_eq!(config.ttl(), Duration::minutes(45));
        assert_eq!(config.secret_len(), 34);
    }

    #[test]
    fn test_token_settings_reject_out_of_range_expiration() {
        for expiration_minutes in [0, -5, TokenSettings::MAX_EXPIRATION_MINUTES + 1, i64::MAX] {
            let settings = TokenSettings {
                secret: "secret_key_at_least_32_bytes_long!".to_string(),
                expiration_minutes,
            };

            assert!(
                matches!(settings.to_token_config(), Err(ConfigError::Message(_))),
                "expiration_minutes: {}",
                expiration_minutes
            );
        }
    }

    #[test]
    fn test_password_settings_partial_override() {
        let settings = PasswordSettings {
            memory_kib: Some(1024),
            iterations: Some(1),
            parallelism: None,
        };

        let hasher = settings.to_hasher().expect("valid params");
        let hash = hasher.hash("password").unwrap();
        assert!(hash.contains("m=1024,t=1,p=1"));
    }
}
