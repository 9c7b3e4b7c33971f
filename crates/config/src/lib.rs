// Configuration Management
//
// This crate handles all configuration loading for the completion router.
// It provides:
// - Configuration structs and deserialization
// - YAML file loading with an environment-variable fallback
// - Default configuration values
//
// This keeps configuration concerns separate from routing logic.

use std::path::Path;
use thiserror::Error;

pub mod types;

// Re-export all configuration types
pub use types::*;

/// Config locations probed by [`ApiConfig::load`], in order
pub const CONFIG_PATHS: [&str; 3] = ["config/config.yaml", "config.yaml", "config/default.yaml"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found. Tried paths: {paths}")]
    FileNotFound { paths: String },

    #[error("Failed to read configuration file: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[from]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration loading interface
impl ApiConfig {
    /// Load configuration from YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                paths: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ApiConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from default locations, falling back to the environment
    pub fn load() -> Result<Self, ConfigError> {
        for path in &CONFIG_PATHS {
            if Path::new(path).exists() {
                return Self::load_from_file(path);
            }
        }

        Self::from_env().map_err(ConfigError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
server:
  host: 127.0.0.1
  port: 8088
completion:
  api_keys: ["key-a", null, "", "key-b"]
  primary_model: model-x
  fallback_models: "model-y, model-z"
  retry_policy: classified
  rotation: time_bucket
  rotation_window_seconds: 10
  task_models:
    quiz:
      primary: quiz-model
      fallbacks: "quiz-backup"
logging:
  level: debug
  format: json
"#
        )
        .unwrap();

        let config = ApiConfig::load_from_file(file.path()).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.completion.api_keys.len(), 4);
        assert_eq!(config.completion.api_keys[1], None);
        assert_eq!(config.completion.primary_model, "model-x");
        assert_eq!(config.completion.retry_policy, RetryPolicyMode::Classified);
        assert_eq!(config.completion.rotation, RotationMode::TimeBucket);
        assert_eq!(config.completion.rotation_window_seconds, 10);
        assert_eq!(
            config.completion.task_models.get("quiz").unwrap().primary,
            "quiz-model"
        );
        // Unspecified fields keep their defaults
        assert_eq!(config.completion.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.completion.default_model, DEFAULT_MODEL);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = ApiConfig::load_from_file("/definitely/not/here.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let result = ApiConfig::from_yaml_str("completion: [not, a, map");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ApiConfig::from_yaml_str("{}").unwrap();
        assert!(config.completion.api_keys.is_empty());
        assert_eq!(config.completion.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.server.port, 3000);
    }
}
