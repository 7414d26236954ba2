use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{ResolverError, Result};

/// Represents the source of a configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Default built-in value
    Default,
    /// From the project `modsolve.json`
    Project,
    /// From environment variable
    Environment(String),
    /// Programmatically set (e.g. command-line flags)
    Command,
}

impl ConfigSource {
    pub fn as_str(&self) -> &str {
        match self {
            ConfigSource::Default => "default",
            ConfigSource::Project => "project",
            ConfigSource::Environment(var) => var,
            ConfigSource::Command => "command",
        }
    }
}

/// Raw configuration data loaded from JSON files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<HashMap<String, serde_json::Value>>,
}

/// Loads configuration from files and the environment
#[derive(Debug)]
pub struct ConfigLoader {
    use_environment: bool,
}

impl ConfigLoader {
    pub fn new(use_environment: bool) -> Self {
        Self { use_environment }
    }

    /// Get a non-empty environment variable, if environment lookups are enabled
    pub fn get_env(&self, var: &str) -> Option<String> {
        if !self.use_environment {
            return None;
        }

        env::var(var).ok().filter(|s| !s.is_empty())
    }

    /// Environment variable name for a config key: "foo-bar" becomes "MODSOLVE_FOO_BAR"
    pub fn env_var_name(key: &str) -> String {
        format!("MODSOLVE_{}", key.replace('-', "_").to_uppercase())
    }

    /// Get a configuration value from environment variable
    pub fn get_env_config(&self, key: &str) -> Option<String> {
        self.get_env(&Self::env_var_name(key))
    }

    /// Get unsigned integer value from environment variable
    pub fn get_env_u64(&self, key: &str) -> Option<u64> {
        self.get_env_config(key).and_then(|val| val.trim().parse().ok())
    }

    /// Get a count from environment variable
    pub fn get_env_usize(&self, key: &str) -> Option<usize> {
        self.get_env_config(key).and_then(|val| val.trim().parse().ok())
    }

    /// Load configuration from a JSON file; a missing file is an empty config
    pub fn load_config_file<P: AsRef<Path>>(&self, path: P) -> Result<RawConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(RawConfig::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ResolverError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let config: RawConfig = serde_json::from_str(&contents)
            .map_err(|e| ResolverError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        Ok(config)
    }

    /// Load `modsolve.json` from a project directory
    pub fn load_project_config<P: AsRef<Path>>(&self, project_dir: P) -> Result<RawConfig> {
        self.load_config_file(project_dir.as_ref().join(super::CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_source_as_str() {
        assert_eq!(ConfigSource::Default.as_str(), "default");
        assert_eq!(ConfigSource::Project.as_str(), "project");
        assert_eq!(ConfigSource::Command.as_str(), "command");
        assert_eq!(
            ConfigSource::Environment("MODSOLVE_WORKERS".to_string()).as_str(),
            "MODSOLVE_WORKERS"
        );
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(ConfigLoader::env_var_name("discovery-timeout"), "MODSOLVE_DISCOVERY_TIMEOUT");
    }

    #[test]
    fn test_disabled_environment() {
        let loader = ConfigLoader::new(false);
        assert_eq!(loader.get_env("PATH"), None);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let loader = ConfigLoader::new(false);
        let raw = loader.load_config_file(dir.path().join("nope.json")).unwrap();
        assert!(raw.config.is_none());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modsolve.json");
        fs::write(&path, "{ not json").unwrap();

        let loader = ConfigLoader::new(false);
        let err = loader.load_config_file(&path).unwrap_err();
        assert!(matches!(err, ResolverError::Config(_)));
    }
}
