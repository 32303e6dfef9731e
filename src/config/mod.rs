//! Configuration management for the resource extension adapter
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::protocol::ProviderIdentity;

/// Main adapter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Provider plugin that handles every request
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Provider plugin identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name (e.g., "Kubernetes")
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// Provider version (e.g., "1.0.0")
    #[serde(default = "default_provider_version")]
    pub version: String,
}

fn default_provider_name() -> String {
    "Kubernetes".to_string()
}

fn default_provider_version() -> String {
    "1.0.0".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            version: default_provider_version(),
        }
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self::example()
    }
}

impl ProviderConfig {
    /// Build the provider identity for a request carrying `config`
    pub fn identity(&self, config: serde_json::Value) -> ProviderIdentity {
        ProviderIdentity {
            name: self.name.clone(),
            version: self.version.clone(),
            config,
        }
    }
}

impl AdapterConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: AdapterConfig =
            serde_yaml::from_str(content).context("Failed to parse adapter configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.provider.name.trim().is_empty() {
            anyhow::bail!("provider.name cannot be empty");
        }

        if self.provider.version.trim().is_empty() {
            anyhow::bail!("provider.version cannot be empty");
        }

        Ok(())
    }

    /// Configuration for the Kubernetes provider
    pub fn example() -> Self {
        Self {
            provider: ProviderConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_validation() {
        let mut config = AdapterConfig::example();
        assert!(config.validate().is_ok());

        config.provider.name = String::new();
        assert!(config.validate().is_err());

        config.provider.name = "Kubernetes".to_string();
        config.provider.version = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = AdapterConfig::from_yaml("provider:\n  version: 2.0.0\n").unwrap();
        assert_eq!(config.provider.name, "Kubernetes");
        assert_eq!(config.provider.version, "2.0.0");

        let empty = AdapterConfig::from_yaml("{}").unwrap();
        assert_eq!(empty, AdapterConfig::example());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "provider:\n  name: Custom\n  version: 0.3.1").unwrap();

        let config = AdapterConfig::from_file(file.path()).unwrap();
        assert_eq!(config.provider.name, "Custom");
        assert_eq!(config.provider.version, "0.3.1");
    }

    #[test]
    fn test_from_file_missing() {
        let err = AdapterConfig::from_file("/nonexistent/adapter.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_from_yaml_rejects_empty_name() {
        assert!(AdapterConfig::from_yaml("provider:\n  name: ''\n").is_err());
    }

    #[test]
    fn test_identity_carries_config() {
        let identity = ProviderConfig::default().identity(serde_json::json!({"cluster": "a"}));
        assert_eq!(identity.name, "Kubernetes");
        assert_eq!(identity.version, "1.0.0");
        assert_eq!(identity.config, serde_json::json!({"cluster": "a"}));
    }
}
