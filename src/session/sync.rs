//! Folding an edit-state into a descriptor.
//!
//! [`sync`] is pure: it takes the previous descriptor by value and returns
//! the next one. Icon bytes are copied by the caller through an
//! [`IconStore`](crate::resources::IconStore) before this runs.

use super::EditState;
use super::validate::parse_version_code;
use crate::bundles::{merge_abis, resolve_project_asset};
use crate::descriptor::Descriptor;
use crate::error::ValidationError;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Produce the descriptor that `edit` describes, starting from `descriptor`.
///
/// Collections only ever grow: capability bundles are unioned in, ABIs are
/// merged, and nothing the descriptor already holds is removed. Fails only
/// when the version code does not parse.
pub fn sync(edit: &EditState, mut descriptor: Descriptor) -> Result<Descriptor, ValidationError> {
    if descriptor.main_script.is_empty() {
        if let Some(name) = &edit.source_file_name {
            log::debug!("Defaulting main script to {}", name);
            descriptor.main_script = name.clone();
        }
    }

    descriptor.main_script = edit.main_script.clone();
    descriptor.name = edit.app_name.clone();
    descriptor.package_id = edit.package_id.clone();
    descriptor.version_name = edit.version_name.clone();
    descriptor.project_directory = edit.project_directory.clone();
    descriptor.source_path = PathBuf::from(&edit.source_path);
    descriptor.output_path = PathBuf::from(&edit.output_path);
    descriptor.build_dir = edit.build_dir.clone();

    let launch = &mut descriptor.launch_config;
    launch.hide_launcher_icon = edit.hide_launcher_icon;
    launch.hide_logs = edit.hide_logs;
    launch.stable_mode = edit.stable_mode;
    launch.volume_up_control = edit.volume_up_control;
    launch.display_splash = edit.display_splash;
    launch.splash_text = edit.splash_text.clone();
    launch.service_description = edit.service_description.clone();

    edit.capabilities.apply_to(&mut descriptor);
    if !edit.is_single_file {
        descriptor.assets = resolve_project_asset(
            Some(&edit.project_directory),
            std::mem::take(&mut descriptor.assets),
        );
    }

    descriptor.target_abis = merge_abis(std::mem::take(&mut descriptor.target_abis), &edit.abi_list);

    if descriptor.ignored_directories.is_empty() {
        log::debug!("Seeding ignored directories with {}", edit.build_dir);
        descriptor.ignored_directories.insert(edit.build_dir.clone());
    }

    descriptor.version_code = parse_version_code(&edit.version_code)?;

    descriptor.icon_ref = edit
        .icon
        .as_deref()
        .map(|r| resolve_icon_ref(r, &edit.project_directory));
    descriptor.launch_config.splash_icon_ref = edit
        .splash_icon
        .as_deref()
        .map(|r| resolve_icon_ref(r, &edit.project_directory));

    Ok(descriptor)
}

/// Store a `file:` URI under `project_directory` as a relative path.
///
/// Anything else, including relative paths, other schemes and files outside
/// the project, comes back unchanged.
pub fn resolve_icon_ref(reference: &str, project_directory: &Path) -> String {
    let Ok(url) = Url::parse(reference) else {
        return reference.to_string();
    };
    if url.scheme() != "file" {
        return reference.to_string();
    }
    let Ok(path) = url.to_file_path() else {
        return reference.to_string();
    };
    let Ok(relative) = path.strip_prefix(project_directory) else {
        return reference.to_string();
    };

    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        return reference.to_string();
    }

    let relative = parts.join("/");
    log::debug!("Icon {} stored as {}", reference, relative);
    relative
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundles::{Capabilities, Capability};
    use crate::descriptor::{Asset, OrderedSet};

    fn edit() -> EditState {
        EditState {
            source_path: "/scripts/foo/foo.js".into(),
            output_path: "/scripts/foo/build".into(),
            app_name: "Foo".into(),
            package_id: "com.example.foo".into(),
            version_name: "1.0.0".into(),
            version_code: "3".into(),
            icon: None,
            abi_list: "arm64-v8a, x86_64".into(),
            capabilities: Capabilities::default(),
            main_script: "foo.js".into(),
            hide_launcher_icon: false,
            stable_mode: true,
            hide_logs: false,
            volume_up_control: false,
            display_splash: true,
            splash_text: "hello".into(),
            splash_icon: None,
            service_description: "svc".into(),
            project_directory: "/scripts/foo".into(),
            is_single_file: false,
            source_file_name: Some("foo.js".into()),
            build_dir: "build".into(),
        }
    }

    #[test]
    fn test_sync_copies_scalars_and_defaults() {
        let d = sync(&edit(), Descriptor::default()).unwrap();
        assert_eq!(d.name, "Foo");
        assert_eq!(d.version_code, 3);
        assert_eq!(d.main_script, "foo.js");
        assert!(d.launch_config.stable_mode);
        assert_eq!(d.ignored_directories.as_slice(), &["build".to_string()]);
        assert!(d.assets.contains(&Asset::new("/scripts/foo", "/project")));
        assert_eq!(d.native_libraries.len(), 2);
    }

    #[test]
    fn test_main_script_copied_verbatim() {
        let descriptor = Descriptor {
            main_script: "entry.js".into(),
            ..Default::default()
        };
        let d = sync(&edit(), descriptor.clone()).unwrap();
        assert_eq!(d.main_script, "foo.js");

        let mut e = edit();
        e.main_script.clear();
        let d = sync(&e, descriptor).unwrap();
        assert_eq!(d.main_script, "");
    }

    #[test]
    fn test_single_file_has_no_project_asset() {
        let mut e = edit();
        e.is_single_file = true;
        let d = sync(&e, Descriptor::default()).unwrap();
        assert!(d.assets.is_empty());
    }

    #[test]
    fn test_existing_ignored_directories_kept() {
        let descriptor = Descriptor {
            ignored_directories: OrderedSet::from(vec!["node_modules".to_string()]),
            ..Default::default()
        };
        let d = sync(&edit(), descriptor).unwrap();
        assert_eq!(d.ignored_directories.as_slice(), &["node_modules".to_string()]);
    }

    #[test]
    fn test_bad_version_code_fails() {
        let mut e = edit();
        e.version_code = "12a".into();
        assert!(sync(&e, Descriptor::default()).is_err());
    }

    #[test]
    fn test_disabled_capability_keeps_entries() {
        let mut e = edit();
        e.set_capability(Capability::OpenCv, true);
        let first = sync(&e, Descriptor::default()).unwrap();
        e.set_capability(Capability::OpenCv, false);
        let second = sync(&e, first.clone()).unwrap();
        assert_eq!(first.native_libraries, second.native_libraries);
        assert!(
            second
                .native_libraries
                .contains(&"libopencv_java4.so".to_string())
        );
    }

    #[test]
    fn test_icon_ref_made_relative_under_project() {
        let dir = Path::new("/scripts/foo");
        assert_eq!(
            resolve_icon_ref("file:///scripts/foo/res/logo.png", dir),
            "res/logo.png"
        );
        assert_eq!(
            resolve_icon_ref("file:///elsewhere/logo.png", dir),
            "file:///elsewhere/logo.png"
        );
        assert_eq!(
            resolve_icon_ref("content://media/42", dir),
            "content://media/42"
        );
        assert_eq!(resolve_icon_ref("res/logo.png", dir), "res/logo.png");
    }
}
