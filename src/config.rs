//! Server configuration.
//!
//! Values are read from an optional `config/tracker` file (any format the
//! `config` crate understands) and then from `CAMPAIGN_TRACKER__*`
//! environment variables, e.g. `CAMPAIGN_TRACKER__DATABASE__URI`. Lists such
//! as `CAMPAIGN_TRACKER__CORS__ALLOWED_ORIGINS` are comma separated. Anything
//! left unset falls back to the defaults below.

use serde::Deserialize;

pub const ENV_PREFIX: &str = "CAMPAIGN_TRACKER";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    /// Drop the database and insert demo campaigns on startup.
    #[serde(default)]
    pub seed: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: DatabaseBackend,
    #[serde(default = "default_database_uri")]
    pub uri: String,
    #[serde(default = "default_database_name")]
    pub name: String,
}

/// Origins the browser frontend is served from.
#[derive(Clone, Debug, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Mongo,
    Memory,
}

impl Default for DatabaseBackend {
    fn default() -> Self {
        DatabaseBackend::Mongo
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_database_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database_name() -> String {
    "campaign_tracker".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            database: DatabaseConfig::default(),
            cors: CorsConfig::default(),
            seed: false,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            uri: default_database_uri(),
            name: default_database_name(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Config::load_from(environment())
    }

    fn load_from(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/tracker").required(false))
            .add_source(environment);

        let config = builder.build()?;
        config.try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_mongo() {
        let config = Config::default();

        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.database.backend, DatabaseBackend::Mongo);
        assert_eq!(config.database.uri, "mongodb://localhost:27017");
        assert_eq!(config.database.name, "campaign_tracker");
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000"]);
        assert!(!config.seed);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: Config = config::Config::builder()
            .set_override("database.backend", "memory")
            .unwrap()
            .set_override("seed", true)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.database.backend, DatabaseBackend::Memory);
        assert_eq!(config.database.name, "campaign_tracker");
        assert!(config.seed);
    }

    #[test]
    fn loads_nested_keys_from_prefixed_environment() {
        let variables = [
            ("CAMPAIGN_TRACKER__DATABASE__BACKEND", "memory"),
            ("CAMPAIGN_TRACKER__DATABASE__NAME", "tracker_test"),
            ("CAMPAIGN_TRACKER__SEED", "true"),
            (
                "CAMPAIGN_TRACKER__CORS__ALLOWED_ORIGINS",
                "http://localhost:3000,https://tracker.example.com",
            ),
        ];
        let source = variables
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        let config = Config::load_from(environment().source(Some(source))).unwrap();

        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.database.backend, DatabaseBackend::Memory);
        assert_eq!(config.database.name, "tracker_test");
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://localhost:3000", "https://tracker.example.com"]
        );
        assert!(config.seed);
    }
}
