//! Configuration loading and data folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// TOML configuration file contents (`~/.config/tableo/tableo-gi.toml`)
///
/// All fields optional; missing file yields defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Data folder holding the SQLite database
    pub data_folder: Option<String>,
    /// API key for the generative extraction service
    pub extraction_api_key: Option<String>,
    /// Base URL of the extraction service (chat completions endpoint)
    pub extraction_base_url: Option<String>,
    /// Model name requested from the extraction service
    pub extraction_model: Option<String>,
}

/// Default configuration file path for the platform
pub fn config_file_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("tableo").join("tableo-gi.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Load TOML configuration, returning defaults when the file is absent
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Data folder resolution, priority order:
/// 1. Environment variable override (highest priority)
/// 2. TOML config file
/// 3. OS-dependent compiled default (fallback)
pub fn resolve_data_folder(env_override: Option<&str>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = env_override {
        return PathBuf::from(path);
    }

    if let Some(path) = &config.data_folder {
        return PathBuf::from(path);
    }

    default_data_folder()
}

/// Get OS-dependent default data folder path
fn default_data_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/tableo
        dirs::data_local_dir()
            .map(|d| d.join("tableo"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/tableo"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/tableo
        dirs::data_dir()
            .map(|d| d.join("tableo"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/tableo"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\tableo
        dirs::data_local_dir()
            .map(|d| d.join("tableo"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\tableo"))
    } else {
        PathBuf::from("./tableo_data")
    }
}

/// Ensure the data folder exists and return the database path inside it
pub fn database_path(data_folder: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(data_folder)?;
    Ok(data_folder.join("tableo.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_override_wins_over_toml() {
        let config = TomlConfig {
            data_folder: Some("/from/toml".to_string()),
            ..Default::default()
        };

        let resolved = resolve_data_folder(Some("/from/env"), &config);
        assert_eq!(resolved, PathBuf::from("/from/env"));
    }

    #[test]
    fn test_toml_wins_over_default() {
        let config = TomlConfig {
            data_folder: Some("/from/toml".to_string()),
            ..Default::default()
        };

        let resolved = resolve_data_folder(None, &config);
        assert_eq!(resolved, PathBuf::from("/from/toml"));
    }

    #[test]
    fn test_missing_config_file_yields_defaults() {
        let config = load_toml_config(Path::new("/nonexistent/tableo-gi.toml")).unwrap();
        assert!(config.data_folder.is_none());
        assert!(config.extraction_api_key.is_none());
    }

    #[test]
    fn test_toml_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tableo-gi.toml");
        std::fs::write(
            &path,
            r#"
data_folder = "/srv/tableo"
extraction_api_key = "sk-test"
extraction_model = "gpt-4o-mini"
"#,
        )
        .unwrap();

        let config = load_toml_config(&path).unwrap();
        assert_eq!(config.data_folder.as_deref(), Some("/srv/tableo"));
        assert_eq!(config.extraction_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.extraction_model.as_deref(), Some("gpt-4o-mini"));
        assert!(config.extraction_base_url.is_none());
    }
}
