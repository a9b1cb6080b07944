use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Token signing secret. Deliberately has no default: a missing secret
    /// surfaces as a 500 "Server configuration error." at request time
    /// rather than silently signing with a well-known value.
    pub jwt_secret: Option<String>,
    pub token_ttl_seconds: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub api_max: u32,
    pub auth_max: u32,
    pub create_max: u32,
    pub window_seconds: u64,
    pub create_window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_max: 100,
            auth_max: 5,
            create_max: 10,
            window_seconds: 15 * 60,
            create_window_seconds: 60,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.cors_origin", "http://localhost:3000")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.token_ttl_seconds", 3600)?
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (with CLASSHUB__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("CLASSHUB").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                cors_origin: "http://localhost:3000".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://classhub.db".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                jwt_secret: None,
                token_ttl_seconds: 3600,
            },
            rate_limit: RateLimitConfig::default(),
        }
    }
}
