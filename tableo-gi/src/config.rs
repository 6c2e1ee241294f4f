//! Configuration resolution for tableo-gi
//!
//! Extraction service settings resolve ENV -> TOML, warning when both are
//! set. The API key is required at startup: the fallback path must be
//! usable before the first complex upload arrives, not fail on it.

use crate::services::extraction_client::{ExtractionConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use tableo_common::config::TomlConfig;
use tableo_common::{Error, Result};
use tracing::{info, warn};

/// Environment variable names
pub const ENV_API_KEY: &str = "TABLEO_EXTRACTION_API_KEY";
pub const ENV_BASE_URL: &str = "TABLEO_EXTRACTION_BASE_URL";
pub const ENV_MODEL: &str = "TABLEO_EXTRACTION_MODEL";

/// Resolve extraction service configuration
///
/// Priority: environment variable, then TOML config file.
pub fn resolve_extraction_config(toml_config: &TomlConfig) -> Result<ExtractionConfig> {
    let env_key = std::env::var(ENV_API_KEY).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_config
        .extraction_api_key
        .clone()
        .filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "Extraction API key found in both environment and TOML. Using environment (highest priority)."
        );
    }

    let api_key = match (env_key, toml_key) {
        (Some(key), _) => {
            info!("Extraction API key loaded from environment variable");
            key
        }
        (None, Some(key)) => {
            info!("Extraction API key loaded from TOML config");
            key
        }
        (None, None) => {
            return Err(Error::Config(format!(
                "Extraction API key not configured. Please configure using one of:\n\
                 1. Environment: {}=your-key-here\n\
                 2. TOML config: ~/.config/tableo/tableo-gi.toml (extraction_api_key = \"your-key\")",
                ENV_API_KEY
            )));
        }
    };

    let base_url = std::env::var(ENV_BASE_URL)
        .ok()
        .or_else(|| toml_config.extraction_base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let model = std::env::var(ENV_MODEL)
        .ok()
        .or_else(|| toml_config.extraction_model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    Ok(ExtractionConfig {
        api_key,
        base_url,
        model,
    })
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("sk-abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    fn test_toml_key_used_when_env_unset() {
        // Process env for these names is never set in the test run
        let config = TomlConfig {
            extraction_api_key: Some("sk-from-toml".to_string()),
            extraction_model: Some("test-model".to_string()),
            ..Default::default()
        };

        let resolved = resolve_extraction_config(&config).unwrap();
        assert_eq!(resolved.api_key, "sk-from-toml");
        assert_eq!(resolved.model, "test-model");
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let result = resolve_extraction_config(&TomlConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
