//! Harness configuration
//!
//! This module provides runtime configuration loading from JSON files so
//! the harness can be pointed at different deployments of the meals and
//! diets services without recompilation. A missing or unparseable config
//! file degrades to the built-in defaults with a logged warning.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub endpoints: EndpointConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub files: FileConfig,
}

/// Base URLs of the two services under test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Meals service (owns /dishes and /meals)
    pub meals_base: String,
    /// Diets service (owns /diets)
    pub diets_base: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            meals_base: "http://127.0.0.1:8000".to_string(),
            diets_base: "http://127.0.0.1:8001".to_string(),
        }
    }
}

/// HTTP client behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

/// Default file locations for the file-driven query script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// Input file, one dish name per line
    pub query_path: String,
    /// Output file, one formatted sentence per line
    pub response_path: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            query_path: "query.txt".to_string(),
            response_path: "response.txt".to_string(),
        }
    }
}

impl Default for HarnessConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            endpoints: EndpointConfig::default(),
            http: HttpConfig::default(),
            files: FileConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// * `HarnessConfig` - Loaded configuration, or the defaults if the
    ///   file is missing or not valid JSON
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.endpoints.meals_base, "http://127.0.0.1:8000");
        assert_eq!(config.endpoints.diets_base, "http://127.0.0.1:8001");
        assert_eq!(config.http.timeout_ms, 30_000);
        assert_eq!(config.files.query_path, "query.txt");
        assert_eq!(config.files.response_path, "response.txt");
    }

    #[test]
    fn test_json_roundtrip() {
        let config = HarnessConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: HarnessConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.endpoints.meals_base, config.endpoints.meals_base);
        assert_eq!(parsed.http.timeout_ms, config.http.timeout_ms);
        assert_eq!(parsed.files.response_path, config.files.response_path);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: HarnessConfig =
            serde_json::from_str(r#"{"http": {"timeout_ms": 500}}"#).unwrap();
        assert_eq!(parsed.http.timeout_ms, 500);
        assert_eq!(parsed.endpoints.meals_base, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = HarnessConfig::load_from_file("does-not-exist.json");
        assert_eq!(config.http.timeout_ms, 30_000);
    }
}
