//! Transient, user-editable mirror of a descriptor.

use crate::bundles::catalog::abi;
use crate::bundles::{Capabilities, Capability};
use crate::descriptor::Descriptor;
use crate::project::ProjectLayout;
use crate::settings::ToolSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Every descriptor field as an independently editable value, plus
/// session-only capability toggles.
///
/// Text fields stay text until synchronized so that invalid input (a
/// version code of `12a`) can be held and reported instead of lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditState {
    /// Main script path as typed
    pub source_path: String,
    /// Build output path as typed
    pub output_path: String,
    /// Application name
    pub app_name: String,
    /// Dotted package identifier
    pub package_id: String,
    /// Version name
    pub version_name: String,
    /// Version code, unparsed
    pub version_code: String,
    /// Launcher icon path or URI
    pub icon: Option<String>,
    /// Comma-separated ABI list
    pub abi_list: String,
    /// Optional bundle toggles
    pub capabilities: Capabilities,
    /// Main script file name
    pub main_script: String,
    /// Hide the launcher icon
    pub hide_launcher_icon: bool,
    /// Stable mode
    pub stable_mode: bool,
    /// Hide the log window
    pub hide_logs: bool,
    /// Volume-up stops scripts
    pub volume_up_control: bool,
    /// Show a splash screen
    pub display_splash: bool,
    /// Splash caption
    pub splash_text: String,
    /// Splash icon path or URI
    pub splash_icon: Option<String>,
    /// Accessibility service description
    pub service_description: String,

    /// Directory the descriptor lives in
    pub project_directory: PathBuf,
    /// Whether the script is still loose
    pub is_single_file: bool,
    /// File name of the opened script, when it is a file that exists
    pub source_file_name: Option<String>,
    /// Build output subdirectory, relative to the project directory
    pub build_dir: String,
}

impl EditState {
    /// Defaults for a script that has no descriptor yet
    pub fn fresh(layout: &ProjectLayout, settings: &ToolSettings) -> Self {
        let source_file_name = layout.script_file_name();
        let main_script = match &source_file_name {
            Some(name) if name.ends_with(".js") => name.clone(),
            _ => settings.default_main_script.clone(),
        };

        Self {
            source_path: layout.source().to_string_lossy().into_owned(),
            output_path: layout
                .default_output_path(&settings.build_dir)
                .to_string_lossy()
                .into_owned(),
            app_name: String::new(),
            package_id: String::new(),
            version_name: crate::descriptor::DEFAULT_VERSION_NAME.to_string(),
            version_code: crate::descriptor::DEFAULT_VERSION_CODE.to_string(),
            icon: None,
            abi_list: settings.default_abi_field(),
            capabilities: Capabilities::default(),
            main_script,
            hide_launcher_icon: false,
            stable_mode: false,
            hide_logs: false,
            volume_up_control: false,
            display_splash: true,
            splash_text: settings.splash_text.clone(),
            splash_icon: None,
            service_description: settings.service_description.clone(),
            project_directory: layout.directory().to_path_buf(),
            is_single_file: layout.is_single_file(),
            source_file_name,
            build_dir: settings.build_dir.clone(),
        }
    }

    /// Populate from a persisted descriptor, inferring toggle state from its collections
    pub fn from_descriptor(
        layout: &ProjectLayout,
        settings: &ToolSettings,
        descriptor: &Descriptor,
    ) -> Self {
        let mut edit = Self::fresh(layout, settings);
        let launch = &descriptor.launch_config;

        if !layout.source_is_file() && !descriptor.source_path.as_os_str().is_empty() {
            edit.source_path = descriptor.source_path.to_string_lossy().into_owned();
        }
        if !descriptor.output_path.as_os_str().is_empty() {
            edit.output_path = descriptor.output_path.to_string_lossy().into_owned();
        }
        if !descriptor.main_script.is_empty() {
            edit.main_script = descriptor.main_script.clone();
        }
        if !descriptor.build_dir.is_empty() {
            edit.build_dir = descriptor.build_dir.clone();
        }

        edit.app_name = descriptor.name.clone();
        edit.package_id = descriptor.package_id.clone();
        edit.version_name = descriptor.version_name.clone();
        edit.version_code = descriptor.version_code.to_string();
        edit.icon = descriptor.icon_ref.clone();
        edit.capabilities = Capabilities::detect(descriptor);

        let has_known_abi = descriptor
            .target_abis
            .iter()
            .any(|a| abi::KNOWN.contains(&a.as_str()));
        if has_known_abi {
            edit.abi_list = descriptor
                .target_abis
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
        }

        edit.hide_launcher_icon = launch.hide_launcher_icon;
        edit.stable_mode = launch.stable_mode;
        edit.hide_logs = launch.hide_logs;
        edit.volume_up_control = launch.volume_up_control;
        edit.display_splash = launch.display_splash;
        edit.splash_text = launch.splash_text.clone();
        edit.splash_icon = launch.splash_icon_ref.clone();
        edit.service_description = launch.service_description.clone();

        edit
    }

    /// Switch one capability toggle
    pub fn set_capability(&mut self, capability: Capability, enabled: bool) {
        self.capabilities.set(capability, enabled);
    }
}
