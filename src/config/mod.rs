use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use url::Url;

/// Environment variable holding the PostgreSQL connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.url)
            .map_err(|e| ConfigError::Message(format!("invalid database url: {}", e)))?;

        match parsed.scheme() {
            "postgres" | "postgresql" => {}
            other => {
                return Err(ConfigError::Message(format!(
                    "unsupported database url scheme: {}",
                    other
                )))
            }
        }

        if self.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl Settings {
    /// Loads settings from defaults, optional config files, `APP_*`
    /// variables and finally `DATABASE_URL`.
    pub fn new() -> Result<Self, ConfigError> {
        Self::load("app", env::var(DATABASE_URL_VAR).ok())
    }

    pub fn load(env_prefix: &str, database_url: Option<String>) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let settings: Settings = Config::builder()
            .set_default("environment", run_mode.as_str())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("database.max_connections", 1)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // E.g., `APP_SERVER__PORT=5001` would set `Settings.server.port`
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            )
            .set_override_option("database.url", database_url)?
            .build()?
            .try_deserialize()?;

        if settings.server.workers == 0 {
            return Err(ConfigError::Message("server.workers must be at least 1".to_string()));
        }
        settings.database.validate()?;
        Ok(settings)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
