use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Attempts per conditional-write loop before giving up with a conflict
    #[serde(default = "default_write_attempts")]
    pub max_write_attempts: u32,
    /// Base backoff between contended attempts, in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub retry_backoff_ms: u64,
    #[serde(default = "default_ticket_validity_days")]
    pub ticket_validity_days: i64,
}

fn default_write_attempts() -> u32 {
    4
}

fn default_backoff_ms() -> u64 {
    10
}

fn default_ticket_validity_days() -> i64 {
    7
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            max_write_attempts: default_write_attempts(),
            retry_backoff_ms: default_backoff_ms(),
            ticket_validity_days: default_ticket_validity_days(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of VOYRA)
            // Eg.. `VOYRA_SERVER__PORT=8080` would set the port
            .add_source(config::Environment::with_prefix("VOYRA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
