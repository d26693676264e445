//! Command line argument parsing and validation.

use crate::bundles::Capability;
use crate::session::EditState;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Build-settings editor for script projects
#[derive(Parser, Debug)]
#[command(
    name = "script_build_config",
    version,
    about = "Edit, validate and package the build configuration of a script or project",
    long_about = "Reconcile build settings into a project descriptor and hand it to a packager.

Usage:
  script_build_config status /scripts/foo.js
  script_build_config configure /scripts/foo.js --name Foo --package-id com.example.foo --with opencv
  script_build_config promote /scripts/foo.js
  script_build_config build /scripts/foo --packager my-packager"
)]
pub struct Args {
    /// Settings file (defaults to the per-user settings.toml)
    #[arg(long, global = true, env = "SCRIPT_BUILD_SETTINGS", value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Show extra detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the persisted descriptor
    Show {
        /// Script file or project directory
        source: PathBuf,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Report mode, validity and unsaved state
    Status {
        /// Script file or project directory
        source: PathBuf,
    },

    /// Edit fields and save the descriptor
    Configure {
        /// Script file or project directory
        source: PathBuf,
        /// Field edits
        #[command(flatten)]
        fields: FieldArgs,
        /// Print the resulting descriptor instead of saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// Move a loose script into its own project directory
    Promote {
        /// Script file
        source: PathBuf,
    },

    /// Save the descriptor and run the packager
    Build {
        /// Script file or project directory
        source: PathBuf,
        /// Packager executable, resolved on PATH
        #[arg(long, env = "SCRIPT_PACKAGER", default_value = "script-packager")]
        packager: String,
        /// Packager time limit in seconds (defaults to the settings value)
        #[arg(long, value_name = "SECONDS")]
        timeout: Option<u64>,
    },
}

impl Command {
    /// Command name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Show { .. } => "show",
            Command::Status { .. } => "status",
            Command::Configure { .. } => "configure",
            Command::Promote { .. } => "promote",
            Command::Build { .. } => "build",
        }
    }
}

/// Capability names accepted by `--with` and `--without`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityArg {
    /// OpenCV
    #[value(name = "opencv")]
    OpenCv,
    /// ML Kit OCR
    MlkitOcr,
    /// Terminal emulator
    TerminalEmulator,
    /// Accessibility services permission
    AccessibilityServices,
    /// Background start permission
    BackgroundStart,
    /// Draw overlay permission
    DrawOverlay,
}

impl From<CapabilityArg> for Capability {
    fn from(arg: CapabilityArg) -> Self {
        match arg {
            CapabilityArg::OpenCv => Capability::OpenCv,
            CapabilityArg::MlkitOcr => Capability::MlkitOcr,
            CapabilityArg::TerminalEmulator => Capability::TerminalEmulator,
            CapabilityArg::AccessibilityServices => Capability::AccessibilityServices,
            CapabilityArg::BackgroundStart => Capability::BackgroundStart,
            CapabilityArg::DrawOverlay => Capability::DrawOverlay,
        }
    }
}

/// Field edits for `configure`; anything left out keeps its current value
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct FieldArgs {
    /// Application name
    #[arg(long)]
    pub name: Option<String>,
    /// Dotted package id, e.g. com.example.app
    #[arg(long)]
    pub package_id: Option<String>,
    /// Version name
    #[arg(long)]
    pub version_name: Option<String>,
    /// Version code (digits only)
    #[arg(long)]
    pub version_code: Option<String>,
    /// Launcher icon: path or file:// URI
    #[arg(long)]
    pub icon: Option<String>,
    /// Splash icon: path or file:// URI
    #[arg(long)]
    pub splash_icon: Option<String>,
    /// Comma-separated ABIs, merged into the existing list
    #[arg(long)]
    pub abis: Option<String>,
    /// Main script file name
    #[arg(long)]
    pub main_script: Option<String>,
    /// Build output path
    #[arg(long)]
    pub output_path: Option<String>,
    /// Splash caption
    #[arg(long)]
    pub splash_text: Option<String>,
    /// Accessibility service description
    #[arg(long)]
    pub service_description: Option<String>,
    /// Enable a capability bundle
    #[arg(long = "with", value_enum, value_name = "CAPABILITY")]
    pub with: Vec<CapabilityArg>,
    /// Switch a capability toggle off (entries already added stay)
    #[arg(long = "without", value_enum, value_name = "CAPABILITY")]
    pub without: Vec<CapabilityArg>,
    /// Hide the launcher icon after install
    #[arg(long, value_name = "BOOL")]
    pub hide_launcher_icon: Option<bool>,
    /// Stable mode
    #[arg(long, value_name = "BOOL")]
    pub stable_mode: Option<bool>,
    /// Hide the log window
    #[arg(long, value_name = "BOOL")]
    pub hide_logs: Option<bool>,
    /// Stop scripts with volume-up
    #[arg(long, value_name = "BOOL")]
    pub volume_up_control: Option<bool>,
    /// Show a splash screen
    #[arg(long, value_name = "BOOL")]
    pub display_splash: Option<bool>,
}

impl FieldArgs {
    /// Apply every given field to `edit`
    pub fn apply(&self, edit: &mut EditState) {
        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }

        set(&mut edit.app_name, &self.name);
        set(&mut edit.package_id, &self.package_id);
        set(&mut edit.version_name, &self.version_name);
        set(&mut edit.version_code, &self.version_code);
        set(&mut edit.abi_list, &self.abis);
        set(&mut edit.main_script, &self.main_script);
        set(&mut edit.output_path, &self.output_path);
        set(&mut edit.splash_text, &self.splash_text);
        set(&mut edit.service_description, &self.service_description);
        set(&mut edit.hide_launcher_icon, &self.hide_launcher_icon);
        set(&mut edit.stable_mode, &self.stable_mode);
        set(&mut edit.hide_logs, &self.hide_logs);
        set(&mut edit.volume_up_control, &self.volume_up_control);
        set(&mut edit.display_splash, &self.display_splash);

        if self.icon.is_some() {
            edit.icon = self.icon.clone();
        }
        if self.splash_icon.is_some() {
            edit.splash_icon = self.splash_icon.clone();
        }

        for capability in &self.with {
            edit.set_capability((*capability).into(), true);
        }
        for capability in &self.without {
            edit.set_capability((*capability).into(), false);
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Configure { fields, .. } => {
                if let Some(both) = fields.with.iter().find(|c| fields.without.contains(c)) {
                    return Err(format!(
                        "capability '{}' given to both --with and --without",
                        Capability::from(*both)
                    ));
                }
            }
            Command::Build { packager, timeout, .. } => {
                if packager.trim().is_empty() {
                    return Err("--packager must not be empty".to_string());
                }
                if *timeout == Some(0) {
                    return Err("--timeout must be at least 1 second".to_string());
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
    /// Explicit settings file, if any
    pub settings_path: Option<PathBuf>,
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print verbose message
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }

    /// Check if verbose output is enabled
    pub fn is_verbose(&self) -> bool {
        self.output.is_verbose()
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.output.is_quiet()
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
            settings_path: args.settings.clone(),
        }
    }
}
