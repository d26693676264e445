//! Persisted project descriptor and its nested records.
//!
//! Field names are the wire contract with the packaging pipeline; they are
//! serialized in camelCase and in declaration order so a load/save cycle
//! reproduces the file byte for byte.

use super::OrderedSet;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Default build output subdirectory
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Default version name for a fresh descriptor
pub const DEFAULT_VERSION_NAME: &str = "1.0.0";

/// Default version code for a fresh descriptor
pub const DEFAULT_VERSION_CODE: u32 = 1;

/// Persisted configuration record, one per project or loose script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Descriptor {
    /// Application name shown to users
    pub name: String,
    /// Dotted package identifier
    pub package_id: String,
    /// Human-readable version
    pub version_name: String,
    /// Monotonic version number
    #[serde(deserialize_with = "deserialize_version_code")]
    pub version_code: u32,
    /// Absolute directory the project lives in
    pub project_directory: PathBuf,
    /// Main script path, relative or absolute
    pub source_path: PathBuf,
    /// Where build artifacts are written
    pub output_path: PathBuf,
    /// Main script file name
    pub main_script: String,
    /// Launcher icon, relative to the project directory when possible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_ref: Option<String>,
    /// Run-time behavior of the packaged app
    pub launch_config: LaunchConfig,
    /// Files copied into the package
    pub assets: OrderedSet<Asset>,
    /// Native library file names bundled into the package
    pub native_libraries: OrderedSet<String>,
    /// Target ABI identifiers
    pub target_abis: OrderedSet<String>,
    /// Relative paths excluded from packaging
    pub ignored_directories: OrderedSet<String>,
    /// Build output subdirectory, relative to the project directory
    pub build_dir: String,
}

/// Launch-time flags and splash configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LaunchConfig {
    /// Hide the launcher icon after install
    pub hide_launcher_icon: bool,
    /// Suppress the log window
    pub hide_logs: bool,
    /// Run scripts in stable mode
    pub stable_mode: bool,
    /// Stop scripts with the volume-up key
    pub volume_up_control: bool,
    /// Show the splash screen on launch
    pub display_splash: bool,
    /// Splash screen caption
    pub splash_text: String,
    /// Splash icon, relative to the project directory when possible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub splash_icon_ref: Option<String>,
    /// Accessibility service description
    pub service_description: String,
    /// Permission tags requested by the packaged app
    pub permissions: OrderedSet<String>,
}

/// A `{source, destination}` copy instruction for the packager.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    /// Path or URI the packager copies from
    pub source: String,
    /// Path inside the package
    pub destination: String,
}

impl Asset {
    /// Creates an asset copy entry
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

impl Default for Descriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            package_id: String::new(),
            version_name: DEFAULT_VERSION_NAME.to_string(),
            version_code: DEFAULT_VERSION_CODE,
            project_directory: PathBuf::new(),
            source_path: PathBuf::new(),
            output_path: PathBuf::new(),
            main_script: String::new(),
            icon_ref: None,
            launch_config: LaunchConfig::default(),
            assets: OrderedSet::new(),
            native_libraries: OrderedSet::new(),
            target_abis: OrderedSet::new(),
            ignored_directories: OrderedSet::new(),
            build_dir: DEFAULT_BUILD_DIR.to_string(),
        }
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            hide_launcher_icon: false,
            hide_logs: false,
            stable_mode: false,
            volume_up_control: false,
            display_splash: true,
            splash_text: String::new(),
            splash_icon_ref: None,
            service_description: String::new(),
            permissions: OrderedSet::new(),
        }
    }
}

impl Descriptor {
    /// Serializes to the stable on-disk form (pretty JSON plus trailing newline).
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Parses the on-disk form.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }

    /// One-line summary for terminal output
    pub fn summary(&self) -> String {
        format!(
            "{} ({}) v{} [{}] - {} libs, {} assets, {} permissions",
            if self.name.is_empty() { "<unnamed>" } else { &self.name },
            if self.package_id.is_empty() { "<no package id>" } else { &self.package_id },
            self.version_name,
            self.version_code,
            self.native_libraries.len(),
            self.assets.len(),
            self.launch_config.permissions.len(),
        )
    }
}

/// Version codes are signed 32-bit on the packaging side
fn deserialize_version_code<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u32::deserialize(deserializer)?;
    if code > i32::MAX as u32 {
        return Err(serde::de::Error::custom(format!(
            "versionCode {code} exceeds {}",
            i32::MAX
        )));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Descriptor {
        let mut d = Descriptor {
            name: "Demo".into(),
            package_id: "com.example.demo".into(),
            version_code: 7,
            project_directory: "/scripts/demo".into(),
            source_path: "/scripts/demo/main.js".into(),
            output_path: "/scripts/demo/build".into(),
            main_script: "main.js".into(),
            icon_ref: Some("res/logo.png".into()),
            ..Default::default()
        };
        d.assets.insert(Asset::new("/scripts/demo", "/project"));
        d.native_libraries.insert("libopencv_java4.so".into());
        d.target_abis.insert("arm64-v8a".into());
        d.launch_config.permissions.insert("draw_overlay".into());
        d
    }

    #[test]
    fn test_json_round_trip_is_byte_identical() {
        let first = sample().to_json().unwrap();
        let reloaded = Descriptor::from_json(&first).unwrap();
        assert_eq!(reloaded, sample());
        assert_eq!(reloaded.to_json().unwrap(), first);
    }

    #[test]
    fn test_wire_field_names() {
        let json = sample().to_json().unwrap();
        for key in [
            "\"packageId\"",
            "\"versionCode\"",
            "\"launchConfig\"",
            "\"hideLauncherIcon\"",
            "\"nativeLibraries\"",
            "\"targetAbis\"",
            "\"ignoredDirectories\"",
            "\"destination\"",
        ] {
            assert!(json.contains(key), "missing {key}");
        }
        assert!(!json.contains("splashIconRef"));
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let d = Descriptor::from_json(r#"{"name":"x"}"#).unwrap();
        assert_eq!(d.version_name, DEFAULT_VERSION_NAME);
        assert_eq!(d.build_dir, DEFAULT_BUILD_DIR);
        assert!(d.launch_config.display_splash);
    }

    #[test]
    fn test_out_of_range_version_code_rejected() {
        assert!(Descriptor::from_json(r#"{"versionCode": 2147483647}"#).is_ok());
        let err = Descriptor::from_json(r#"{"versionCode": 2147483648}"#).unwrap_err();
        assert!(err.to_string().contains("versionCode"));
    }
}
