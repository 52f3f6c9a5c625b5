//! Layered configuration (SPEC_FULL §4.8): compiled-in defaults, an
//! optional TOML file, then `BCSCAN_`-prefixed environment overrides.

use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Deployment environment; selects the logging sink (SPEC_FULL §4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Human-readable, ANSI-colored logs
    #[default]
    Development,
    /// JSON lines to stdout
    Production,
}

/// The process's assembled configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory tree containing YAML rule files
    pub rules_dir: PathBuf,
    /// Redis connection string backing the cache, update channel, and
    /// (standing in for the bus) the transaction source
    pub redis_url: String,
    /// Postgres connection string for the risk-event sink
    pub database_url: String,
    /// Pub/sub channel the transaction bus adapter reads
    pub bus_topic: String,
    /// Number of parallel worker tasks
    pub worker_concurrency: usize,
    /// Deployment environment
    pub environment: Environment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_dir: PathBuf::from("./rules"),
            redis_url: "redis://127.0.0.1:6379".to_owned(),
            database_url: "postgres://localhost/bcscan".to_owned(),
            bus_topic: "bcscan.transactions".to_owned(),
            worker_concurrency: 4,
            environment: Environment::Development,
        }
    }
}

impl Config {
    /// Load configuration from compiled-in defaults, an optional
    /// `config/<file>.toml`, then `BCSCAN_`-prefixed environment
    /// variables, in that precedence order.
    pub fn load(toml_path: Option<&std::path::Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = toml_path {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("BCSCAN_"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_any_source() {
        let config = Config::load(None).expect("defaults are always valid");
        assert_eq!(config.worker_concurrency, 4);
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn env_override_wins_over_default() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("BCSCAN_WORKER_CONCURRENCY", "16");
            jail.set_env("BCSCAN_REDIS_URL", "redis://cache:6379");
            let config = Config::load(None).expect("config loads");
            assert_eq!(config.worker_concurrency, 16);
            assert_eq!(config.redis_url, "redis://cache:6379");
            Ok(())
        });
    }

    #[test]
    fn toml_file_overrides_default_and_env_overrides_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("bcscan.toml", "worker_concurrency = 8\nbus_topic = \"custom\"\n")?;
            jail.set_env("BCSCAN_BUS_TOPIC", "from_env");
            let config =
                Config::load(Some(&jail.directory().join("bcscan.toml"))).expect("config loads");
            assert_eq!(config.worker_concurrency, 8);
            assert_eq!(config.bus_topic, "from_env");
            Ok(())
        });
    }
}
