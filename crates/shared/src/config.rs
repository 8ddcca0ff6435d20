//! Application configuration management.

use chrono::Duration;
use serde::Deserialize;

use crate::jwt::JwtConfig;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT settings as they appear in configuration files.
///
/// Access and refresh tokens are signed with different secrets so a leaked
/// access secret cannot be used to mint refresh tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing access tokens.
    pub access_secret: String,
    /// Secret key for signing refresh tokens.
    pub refresh_secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

impl JwtSettings {
    /// Converts the file settings into the token service configuration.
    #[must_use]
    pub fn to_jwt_config(&self) -> JwtConfig {
        JwtConfig {
            access_secret: self.access_secret.clone(),
            refresh_secret: self.refresh_secret.clone(),
            access_token_ttl: seconds(self.access_token_expiry_secs),
            refresh_token_ttl: seconds(self.refresh_token_expiry_secs),
        }
    }
}

fn seconds(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> u64 {
    15_552_000 // 180 days
}

/// CORS configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to send credentialed requests. Empty mirrors the request origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `KHATA__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("KHATA")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("KHATA__DATABASE__URL", Some("postgres://localhost/khata_test")),
                ("KHATA__JWT__ACCESS_SECRET", Some("access")),
                ("KHATA__JWT__REFRESH_SECRET", Some("refresh")),
                ("KHATA__SERVER__PORT", Some("9090")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/khata_test");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.jwt.access_secret, "access");
                assert_eq!(config.jwt.refresh_secret, "refresh");
                assert_eq!(config.jwt.access_token_expiry_secs, 900);
                assert_eq!(config.jwt.refresh_token_expiry_secs, 15_552_000);
                assert!(config.cors.allowed_origins.is_empty());
            },
        );
    }

    #[test]
    fn test_jwt_settings_to_config() {
        let settings = JwtSettings {
            access_secret: "a".to_string(),
            refresh_secret: "r".to_string(),
            access_token_expiry_secs: 900,
            refresh_token_expiry_secs: 15_552_000,
        };
        let config = settings.to_jwt_config();
        assert_eq!(config.access_token_ttl, Duration::minutes(15));
        assert_eq!(config.refresh_token_ttl, Duration::days(180));
        assert_eq!(config.access_secret, "a");
    }

    #[test]
    fn test_load_fails_without_secrets() {
        temp_env::with_vars(
            [
                ("KHATA__DATABASE__URL", Some("postgres://localhost/khata_test")),
                ("KHATA__JWT__ACCESS_SECRET", None::<&str>),
                ("KHATA__JWT__REFRESH_SECRET", None),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
