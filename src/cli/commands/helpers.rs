//! Shared helper functions for command execution.

use crate::cli::RuntimeConfig;
use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::session::BuildSession;
use crate::settings::ToolSettings;
use std::path::Path;

/// Load settings and open `source`, printing any open-time warnings
pub(super) async fn open_session(source: &Path, config: &RuntimeConfig) -> Result<BuildSession> {
    let settings = ToolSettings::load(config.settings_path.as_deref())?;
    config.verbose_println(&format!("Build output directory: {}", settings.build_dir));

    let session = BuildSession::open(source, settings).await?;
    for warning in session.warnings() {
        config.warning_println(&format!("Existing descriptor ignored: {}", warning));
    }
    Ok(session)
}

fn list<I: IntoIterator<Item = String>>(items: I) -> String {
    let joined = items.into_iter().collect::<Vec<_>>().join(", ");
    if joined.is_empty() { "-".to_string() } else { joined }
}

/// Print the interesting parts of a descriptor
pub(super) fn print_descriptor(config: &RuntimeConfig, descriptor: &Descriptor) {
    let out = config.output();
    let launch = &descriptor.launch_config;

    let _ = out.field("Name", &descriptor.name);
    let _ = out.field("Package id", &descriptor.package_id);
    let _ = out.field(
        "Version",
        &format!("{} ({})", descriptor.version_name, descriptor.version_code),
    );
    let _ = out.field("Main script", &descriptor.main_script);
    let _ = out.field("Source", &descriptor.source_path.display().to_string());
    let _ = out.field("Output", &descriptor.output_path.display().to_string());
    if let Some(icon) = &descriptor.icon_ref {
        let _ = out.field("Icon", icon);
    }
    let _ = out.field("ABIs", &list(descriptor.target_abis.iter().cloned()));
    let _ = out.field(
        "Native libraries",
        &list(descriptor.native_libraries.iter().cloned()),
    );
    let _ = out.field(
        "Assets",
        &list(
            descriptor
                .assets
                .iter()
                .map(|a| format!("{} -> {}", a.source, a.destination)),
        ),
    );
    let _ = out.field("Permissions", &list(launch.permissions.iter().cloned()));
    let _ = out.field(
        "Ignored",
        &list(descriptor.ignored_directories.iter().cloned()),
    );
    let _ = out.field(
        "Splash",
        &if launch.display_splash {
            format!("\"{}\"", launch.splash_text)
        } else {
            "off".to_string()
        },
    );
}

/// Print recovery suggestions for an error in verbose mode
pub(super) fn print_suggestions(config: &RuntimeConfig, suggestions: &[String]) {
    if suggestions.is_empty() {
        return;
    }
    config.println("\n💡 Recovery suggestions:");
    for suggestion in suggestions {
        config.indent(suggestion);
    }
}
