//! Tool-level defaults, optionally overridden by a TOML settings file.
//!
//! ```toml
//! build_dir = "dist"
//! default_abis = ["arm64-v8a"]
//! splash_text = "Made with scripts"
//! packager_timeout_secs = 900
//! ```

use crate::bundles::catalog::abi;
use crate::descriptor::DEFAULT_BUILD_DIR;
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file name inside the per-user config directory
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Directory name under the platform config directory
pub const SETTINGS_DIR_NAME: &str = "script_build_config";

/// Defaults applied when a session starts without a persisted descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Build output subdirectory, relative to the project directory
    pub build_dir: String,
    /// ABIs offered in a fresh edit-state
    pub default_abis: Vec<String>,
    /// Main script name when the source is not a `.js` file
    pub default_main_script: String,
    /// Splash caption for new projects
    pub splash_text: String,
    /// Accessibility service description for new projects
    pub service_description: String,
    /// Upper bound on one packager run
    pub packager_timeout_secs: u64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            build_dir: DEFAULT_BUILD_DIR.to_string(),
            default_abis: abi::KNOWN.iter().map(|s| s.to_string()).collect(),
            default_main_script: "main.js".to_string(),
            splash_text: "Powered by Auto.js".to_string(),
            service_description: "Enables script automation through the accessibility service"
                .to_string(),
            packager_timeout_secs: 600,
        }
    }
}

impl ToolSettings {
    /// Resolve settings: explicit path, then the per-user file, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                log::debug!("Loading settings from {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Parse a settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Settings(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse settings from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let settings: ToolSettings = toml::from_str(contents)?;
        if settings.build_dir.trim().is_empty() {
            return Err(ConfigError::Settings("build_dir must not be empty".to_string()));
        }
        Ok(settings)
    }

    /// `<config_dir>/script_build_config/settings.toml`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Default ABI field text, e.g. `arm64-v8a, x86_64`
    pub fn default_abi_field(&self) -> String {
        self.default_abis.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = ToolSettings::from_toml("build_dir = \"dist\"\n").unwrap();
        assert_eq!(settings.build_dir, "dist");
        assert_eq!(settings.default_abi_field(), "arm64-v8a, x86_64");
        assert_eq!(settings.packager_timeout_secs, 600);
    }

    #[test]
    fn test_empty_build_dir_rejected() {
        assert!(ToolSettings::from_toml("build_dir = \"  \"\n").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ToolSettings::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
