use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::account::service::AuthSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub kafka: KafkaConfig,
    pub notification: NotificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub grpc_port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_expiration_hours")]
    pub access_expiration_hours: u64,
    #[serde(default = "default_refresh_expiration_hours")]
    pub refresh_expiration_hours: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    pub sender_address: String,
    /// Link embedded in verification messages
    pub verify_email_url: String,
    /// Link embedded in password reset messages
    pub reset_password_url: String,
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_max_connections() -> u32 {
    5
}

fn default_access_expiration_hours() -> u64 {
    1
}

fn default_refresh_expiration_hours() -> u64 {
    72
}

const SECONDS_PER_HOUR: u64 = 60 * 60;
const RESET_TOKEN_TTL: Duration = Duration::from_secs(SECONDS_PER_HOUR);

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

impl From<&Config> for AuthSettings {
    fn from(config: &Config) -> Self {
        Self {
            access_ttl: Duration::from_secs(
                config.jwt.access_expiration_hours.saturating_mul(SECONDS_PER_HOUR),
            ),
            refresh_ttl: Duration::from_secs(
                config.jwt.refresh_expiration_hours.saturating_mul(SECONDS_PER_HOUR),
            ),
            reset_token_ttl: RESET_TOKEN_TTL,
            sender_address: config.notification.sender_address.clone(),
            reset_password_url: config.notification.reset_password_url.clone(),
        }
    }
}
