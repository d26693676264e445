//! Capability toggles and the pure functions that fold them into descriptor collections.
//!
//! Resolution is monotonically additive: enabling a capability unions its
//! bundle into the target set, disabling it leaves the set untouched. Entries
//! acquired some other way are never stripped.

use super::catalog::{assets, libraries, permissions};
use crate::descriptor::{Asset, Descriptor, OrderedSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Optional feature that contributes a fixed bundle of entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// OpenCV native library
    OpenCv,
    /// ML Kit OCR library and its models
    MlkitOcr,
    /// Terminal emulator libraries
    TerminalEmulator,
    /// Accessibility service permission
    AccessibilityServices,
    /// Background activity start permission
    BackgroundStart,
    /// Overlay drawing permission
    DrawOverlay,
}

/// Entries contributed by one capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityBundle {
    /// Native library file names
    pub libraries: &'static [&'static str],
    /// Asset copy entries
    pub assets: Vec<Asset>,
    /// Permission tags
    pub permissions: &'static [&'static str],
}

impl Capability {
    /// Every capability, in display order
    pub const ALL: [Capability; 6] = [
        Capability::OpenCv,
        Capability::MlkitOcr,
        Capability::TerminalEmulator,
        Capability::AccessibilityServices,
        Capability::BackgroundStart,
        Capability::DrawOverlay,
    ];

    /// The fixed bundle this capability contributes
    pub fn bundle(self) -> CapabilityBundle {
        match self {
            Capability::OpenCv => CapabilityBundle {
                libraries: libraries::OPEN_CV,
                assets: Vec::new(),
                permissions: &[],
            },
            Capability::MlkitOcr => CapabilityBundle {
                libraries: libraries::MLKIT_OCR,
                assets: vec![Asset::new(
                    format!("{}{}", assets::RUNTIME_ASSETS, assets::MLKIT_OCR_MODELS),
                    assets::MLKIT_OCR_MODELS,
                )],
                permissions: &[],
            },
            Capability::TerminalEmulator => CapabilityBundle {
                libraries: libraries::TERMINAL_EMULATOR,
                assets: Vec::new(),
                permissions: &[],
            },
            Capability::AccessibilityServices => CapabilityBundle {
                libraries: &[],
                assets: Vec::new(),
                permissions: &[permissions::ACCESSIBILITY_SERVICES],
            },
            Capability::BackgroundStart => CapabilityBundle {
                libraries: &[],
                assets: Vec::new(),
                permissions: &[permissions::BACKGROUND_START],
            },
            Capability::DrawOverlay => CapabilityBundle {
                libraries: &[],
                assets: Vec::new(),
                permissions: &[permissions::DRAW_OVERLAY],
            },
        }
    }

    /// Short name used on the command line
    pub fn short_name(self) -> &'static str {
        match self {
            Capability::OpenCv => "opencv",
            Capability::MlkitOcr => "mlkit-ocr",
            Capability::TerminalEmulator => "terminal-emulator",
            Capability::AccessibilityServices => "accessibility-services",
            Capability::BackgroundStart => "background-start",
            Capability::DrawOverlay => "draw-overlay",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Union the capability's libraries into `current` when `enabled`.
pub fn resolve_libraries(
    capability: Capability,
    enabled: bool,
    mut current: OrderedSet<String>,
) -> OrderedSet<String> {
    if enabled {
        current.extend(capability.bundle().libraries.iter().map(|s| s.to_string()));
    }
    current
}

/// Union the capability's assets into `current` when `enabled`.
pub fn resolve_assets(
    capability: Capability,
    enabled: bool,
    mut current: OrderedSet<Asset>,
) -> OrderedSet<Asset> {
    if enabled {
        current.extend(capability.bundle().assets);
    }
    current
}

/// Union the capability's permission tags into `current` when `enabled`.
pub fn resolve_permissions(
    capability: Capability,
    enabled: bool,
    mut current: OrderedSet<String>,
) -> OrderedSet<String> {
    if enabled {
        current.extend(capability.bundle().permissions.iter().map(|s| s.to_string()));
    }
    current
}

/// Ensure the project directory itself is shipped as `/project` in project mode.
pub fn resolve_project_asset(
    project_directory: Option<&Path>,
    mut current: OrderedSet<Asset>,
) -> OrderedSet<Asset> {
    if let Some(dir) = project_directory {
        current.insert(Asset::new(dir.to_string_lossy(), assets::PROJECT));
    }
    current
}

/// Merge a comma-separated ABI field into `current`.
///
/// Pre-existing entries keep their order; new ones are appended in field order.
pub fn merge_abis(mut current: OrderedSet<String>, field: &str) -> OrderedSet<String> {
    current.extend(
        field
            .split(',')
            .map(str::trim)
            .filter(|abi| !abi.is_empty())
            .map(str::to_string),
    );
    current
}

/// Whether the descriptor already holds every entry of `capability`'s bundle.
pub fn is_satisfied(capability: Capability, descriptor: &Descriptor) -> bool {
    let bundle = capability.bundle();

    let libs_present = bundle
        .libraries
        .iter()
        .all(|lib| descriptor.native_libraries.iter().any(|l| l == lib));
    let assets_present = bundle
        .assets
        .iter()
        .all(|asset| descriptor.assets.iter().any(|a| a.source == asset.source));
    let permissions_present = bundle
        .permissions
        .iter()
        .all(|p| descriptor.launch_config.permissions.iter().any(|q| q == p));

    libs_present && assets_present && permissions_present
}

/// Session-only toggles, one per capability.
///
/// Toggles never persist; only the entries they add do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// OpenCV
    pub open_cv: bool,
    /// ML Kit OCR
    pub mlkit_ocr: bool,
    /// Terminal emulator
    pub terminal_emulator: bool,
    /// Accessibility services
    pub accessibility_services: bool,
    /// Background start
    pub background_start: bool,
    /// Draw overlay
    pub draw_overlay: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            open_cv: false,
            mlkit_ocr: false,
            terminal_emulator: true,
            accessibility_services: false,
            background_start: false,
            draw_overlay: false,
        }
    }
}

impl Capabilities {
    /// Infer displayed toggle state from what a persisted descriptor already holds
    pub fn detect(descriptor: &Descriptor) -> Self {
        let mut caps = Self::default();
        for capability in Capability::ALL {
            caps.set(capability, is_satisfied(capability, descriptor));
        }
        caps
    }

    /// Toggle state of `capability`
    pub fn get(&self, capability: Capability) -> bool {
        match capability {
            Capability::OpenCv => self.open_cv,
            Capability::MlkitOcr => self.mlkit_ocr,
            Capability::TerminalEmulator => self.terminal_emulator,
            Capability::AccessibilityServices => self.accessibility_services,
            Capability::BackgroundStart => self.background_start,
            Capability::DrawOverlay => self.draw_overlay,
        }
    }

    /// Set toggle state of `capability`
    pub fn set(&mut self, capability: Capability, enabled: bool) {
        let slot = match capability {
            Capability::OpenCv => &mut self.open_cv,
            Capability::MlkitOcr => &mut self.mlkit_ocr,
            Capability::TerminalEmulator => &mut self.terminal_emulator,
            Capability::AccessibilityServices => &mut self.accessibility_services,
            Capability::BackgroundStart => &mut self.background_start,
            Capability::DrawOverlay => &mut self.draw_overlay,
        };
        *slot = enabled;
    }

    /// Capabilities currently switched on
    pub fn enabled(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.get(*c))
            .collect()
    }

    /// Fold every toggle into the descriptor's collections
    pub fn apply_to(&self, descriptor: &mut Descriptor) {
        for capability in Capability::ALL {
            let enabled = self.get(capability);
            if enabled {
                log::debug!("Resolving capability bundle: {}", capability);
            }
            descriptor.native_libraries = resolve_libraries(
                capability,
                enabled,
                std::mem::take(&mut descriptor.native_libraries),
            );
            descriptor.assets =
                resolve_assets(capability, enabled, std::mem::take(&mut descriptor.assets));
            descriptor.launch_config.permissions = resolve_permissions(
                capability,
                enabled,
                std::mem::take(&mut descriptor.launch_config.permissions),
            );
        }
    }
}
