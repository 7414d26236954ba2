use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use super::source::{ConfigLoader, ConfigSource, RawConfig};
use crate::error::{ResolverError, Result};
use crate::package::Environment;

/// Project configuration file name
pub const CONFIG_FILE: &str = "modsolve.json";

pub const DEFAULT_DISCOVERY_TIMEOUT_SECS: u64 = 30;

/// Scan workers: one less than the available parallelism, at least one
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1)
}

/// Settings for one resolution run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ResolverConfig {
    /// Wall-clock bound on the whole discovery phase, in seconds
    pub discovery_timeout: u64,

    /// Concurrent scan workers; `None` uses [`default_worker_count`]
    pub workers: Option<usize>,

    /// Side being loaded; mods declared for the other side are skipped
    pub environment: Environment,

    /// Metadata file read from the root of every source
    pub metadata_file: String,

    #[serde(skip)]
    sources: HashMap<String, ConfigSource>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT_SECS,
            workers: None,
            environment: Environment::Any,
            metadata_file: "mod.json".to_string(),
            sources: HashMap::new(),
        }
    }
}

impl ResolverConfig {
    const KEYS: [&'static str; 4] = ["discovery-timeout", "workers", "environment", "metadata-file"];

    /// Build configuration from all sources (defaults, project file, env)
    pub fn build<P: AsRef<Path>>(project_dir: Option<P>, use_environment: bool) -> Result<Self> {
        let loader = ConfigLoader::new(use_environment);
        let mut config = Self::default();

        for key in Self::KEYS {
            config.sources.insert(key.to_string(), ConfigSource::Default);
        }

        if let Some(project_dir) = &project_dir {
            let project_config = loader.load_project_config(project_dir)?;
            config.merge_raw_config(project_config, ConfigSource::Project)?;
        }

        if use_environment {
            config.apply_env_overrides(&loader)?;
        }

        Ok(config)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout)
    }

    /// Effective number of scan workers
    pub fn worker_count(&self) -> usize {
        self.workers.filter(|n| *n > 0).unwrap_or_else(default_worker_count)
    }

    /// Get the source of a configuration value
    pub fn get_source(&self, key: &str) -> Option<&ConfigSource> {
        self.sources.get(key)
    }

    pub fn set_discovery_timeout(&mut self, seconds: u64) {
        self.discovery_timeout = seconds;
        self.sources.insert("discovery-timeout".to_string(), ConfigSource::Command);
    }

    pub fn set_workers(&mut self, workers: usize) {
        self.workers = Some(workers);
        self.sources.insert("workers".to_string(), ConfigSource::Command);
    }

    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
        self.sources.insert("environment".to_string(), ConfigSource::Command);
    }

    /// Merge raw configuration from a source
    pub fn merge_raw_config(&mut self, raw: RawConfig, source: ConfigSource) -> Result<()> {
        if let Some(config_map) = raw.config {
            for (key, value) in config_map {
                self.merge_config_value(&key, value, source.clone())?;
            }
        }
        Ok(())
    }

    fn merge_config_value(
        &mut self,
        key: &str,
        value: serde_json::Value,
        source: ConfigSource,
    ) -> Result<()> {
        match key {
            "discovery-timeout" => {
                let seconds = value.as_u64().ok_or_else(|| invalid(key, &value))?;
                self.discovery_timeout = seconds;
            }
            "workers" => {
                let workers = value.as_u64().ok_or_else(|| invalid(key, &value))?;
                self.workers = Some(workers as usize);
            }
            "environment" => {
                let environment = value
                    .as_str()
                    .and_then(Environment::parse)
                    .ok_or_else(|| invalid(key, &value))?;
                self.environment = environment;
            }
            "metadata-file" => {
                let file = value
                    .as_str()
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| invalid(key, &value))?;
                self.metadata_file = file.to_string();
            }
            _ => {
                log::debug!("Ignoring unknown config key \"{}\"", key);
                return Ok(());
            }
        }

        self.sources.insert(key.to_string(), source);
        Ok(())
    }

    fn apply_env_overrides(&mut self, loader: &ConfigLoader) -> Result<()> {
        if let Some(timeout) = loader.get_env_u64("discovery-timeout") {
            self.discovery_timeout = timeout;
            self.sources.insert(
                "discovery-timeout".to_string(),
                ConfigSource::Environment(ConfigLoader::env_var_name("discovery-timeout")),
            );
        }

        if let Some(workers) = loader.get_env_usize("workers") {
            self.workers = Some(workers);
            self.sources.insert(
                "workers".to_string(),
                ConfigSource::Environment(ConfigLoader::env_var_name("workers")),
            );
        }

        if let Some(value) = loader.get_env_config("environment") {
            let environment = Environment::parse(&value).ok_or_else(|| {
                ResolverError::Config(format!(
                    "{} must be one of *, client or server, got \"{}\"",
                    ConfigLoader::env_var_name("environment"),
                    value
                ))
            })?;
            self.environment = environment;
            self.sources.insert(
                "environment".to_string(),
                ConfigSource::Environment(ConfigLoader::env_var_name("environment")),
            );
        }

        Ok(())
    }
}

fn invalid(key: &str, value: &serde_json::Value) -> ResolverError {
    ResolverError::Config(format!("Invalid value for \"{}\": {}", key, value))
}
