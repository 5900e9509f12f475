use crate::core::FilterSettings;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub appwrite: AppwriteSettings,
    pub collection: CollectionSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub filtering: FilteringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub brokers: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilteringSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_interactive_limit")]
    pub interactive_limit: usize,
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for FilteringSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            interactive_limit: default_interactive_limit(),
            recommendation_limit: default_recommendation_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl FilteringSettings {
    pub fn to_filter_settings(&self) -> FilterSettings {
        FilterSettings {
            quiet_period: Duration::from_millis(self.debounce_ms),
            interactive_limit: self.interactive_limit,
            recommendation_limit: self.recommendation_limit,
        }
    }
}

fn default_debounce_ms() -> u64 { 500 }
fn default_interactive_limit() -> usize { 20 }
fn default_recommendation_limit() -> usize { 10 }
fn default_max_limit() -> usize { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingSettings {
    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with BROKER_MATCH)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., BROKER_MATCH__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("BROKER_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply well-known unprefixed variables on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(redis_url) = env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", redis_url)?;
    }
    if let Ok(api_key) = env::var("APPWRITE_API_KEY") {
        builder = builder.set_override("appwrite.api_key", api_key)?;
    }
    if let Ok(endpoint) = env::var("APPWRITE_ENDPOINT") {
        builder = builder.set_override("appwrite.endpoint", endpoint)?;
    }
    if let Ok(level) = env::var("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Ok(format) = env::var("LOG_FORMAT") {
        builder = builder.set_override("logging.format", format)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filtering() {
        let filtering = FilteringSettings::default();
        assert_eq!(filtering.debounce_ms, 500);
        assert_eq!(filtering.interactive_limit, 20);
        assert_eq!(filtering.recommendation_limit, 10);
        assert_eq!(filtering.max_limit, 50);

        let settings = filtering.to_filter_settings();
        assert_eq!(settings, FilterSettings::default());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
        assert!(!logging.is_pretty());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("broker_match_settings_test.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 9090

[appwrite]
endpoint = "https://appwrite.test/v1"
api_key = "key"
project_id = "project"
database_id = "db"

[collection]
brokers = "brokers"

[filtering]
debounce_ms = 250

[logging]
level = "debug"
format = "pretty"
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.collection.brokers, "brokers");
        assert_eq!(settings.filtering.debounce_ms, 250);
        assert_eq!(settings.filtering.interactive_limit, 20);
        assert!(settings.cache.redis_url.is_none());
        assert_eq!(settings.logging.level, "debug");
        assert!(settings.logging.is_pretty());
    }
}
