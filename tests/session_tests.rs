//! End-to-end session scenarios against a temporary scripts directory.

use script_build_config::bundles::merge_abis;
use script_build_config::descriptor::{Descriptor, DescriptorStore, OrderedSet};
use script_build_config::error::{ConfigError, ValidationError};
use script_build_config::resources::FsIconStore;
use script_build_config::session::{BuildSession, is_dirty, sync};
use script_build_config::settings::ToolSettings;
use script_build_config::{Capability, ProjectMode};
use std::fs;
use std::path::Path;

async fn open_loose(dir: &Path) -> BuildSession {
    let script = dir.join("foo.js");
    fs::write(&script, "toast('hello')").unwrap();
    BuildSession::open(&script, ToolSettings::default())
        .await
        .unwrap()
}

fn fill_required(session: &mut BuildSession) {
    let edit = session.edit_mut();
    edit.app_name = "Foo".into();
    edit.package_id = "com.example.foo".into();
}

#[tokio::test]
async fn test_promote_loose_script_into_project() {
    let scripts = tempfile::tempdir().unwrap();
    let mut session = open_loose(scripts.path()).await;
    fill_required(&mut session);

    let promotion = session.promote(&FsIconStore).await.unwrap();

    let project = scripts.path().join("foo");
    assert_eq!(promotion.location.directory, project);
    assert!(project.join("foo.js").is_file());
    assert!(project.join("project.json").is_file());
    assert!(!scripts.path().join("foo.js").exists());
    assert!(!scripts.path().join("foo_config.json").exists());
    assert!(!scripts.path().join("res_foo").exists());

    assert_eq!(session.layout().mode(), ProjectMode::Project);
    let saved = session.last_saved().unwrap();
    assert!(saved.source_path.starts_with(&project));
    assert_eq!(saved.project_directory, project);
    assert!(!session.is_dirty());

    let reopened = BuildSession::open(&project, ToolSettings::default())
        .await
        .unwrap();
    assert_eq!(reopened.last_saved(), Some(saved));
}

#[tokio::test]
async fn test_promote_cleans_up_sidecar_and_resources() {
    let scripts = tempfile::tempdir().unwrap();
    let mut session = open_loose(scripts.path()).await;
    fill_required(&mut session);
    fs::create_dir(scripts.path().join("res_foo")).unwrap();
    fs::write(scripts.path().join("res_foo/logo.png"), b"png").unwrap();
    session.edit_mut().icon = Some("res_foo/logo.png".into());
    session.save(&FsIconStore).await.unwrap();
    assert!(scripts.path().join("foo_config.json").is_file());

    session.promote(&FsIconStore).await.unwrap();

    let project = scripts.path().join("foo");
    assert!(!scripts.path().join("foo_config.json").exists());
    assert!(!scripts.path().join("res_foo").exists());
    assert_eq!(fs::read(project.join("res/logo.png")).unwrap(), b"png");
    assert_eq!(
        session.last_saved().unwrap().icon_ref.as_deref(),
        Some("res/logo.png")
    );
}

#[tokio::test]
async fn test_single_segment_package_id_never_persisted() {
    let scripts = tempfile::tempdir().unwrap();
    let mut session = open_loose(scripts.path()).await;
    fill_required(&mut session);
    session.edit_mut().package_id = "com".into();

    let err = session.save(&FsIconStore).await.unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Validation(ValidationError::InvalidPackageId { .. })
    ));
    assert!(!scripts.path().join("foo_config.json").exists());
}

#[tokio::test]
async fn test_non_numeric_version_code_rejected() {
    let scripts = tempfile::tempdir().unwrap();
    let mut session = open_loose(scripts.path()).await;
    fill_required(&mut session);
    session.edit_mut().version_code = "12a".into();

    assert!(matches!(
        session.validate(),
        Err(ConfigError::Validation(ValidationError::InvalidVersionCode { .. }))
    ));
    assert!(session.save(&FsIconStore).await.is_err());
    assert_eq!(session.edit().version_code, "12a");
}

#[tokio::test]
async fn test_dirty_tracks_scalar_edits() {
    let scripts = tempfile::tempdir().unwrap();
    let mut session = open_loose(scripts.path()).await;
    fill_required(&mut session);
    assert!(session.is_dirty());

    session.save(&FsIconStore).await.unwrap();
    assert!(!session.is_dirty());

    session.edit_mut().version_name = "1.1.0".into();
    assert!(session.is_dirty());
    session.edit_mut().version_name = "1.0.0".into();
    assert!(!session.is_dirty());

    session.edit_mut().hide_logs = true;
    assert!(session.is_dirty());
}

#[tokio::test]
async fn test_capability_off_after_save_is_clean() {
    let scripts = tempfile::tempdir().unwrap();
    let mut session = open_loose(scripts.path()).await;
    fill_required(&mut session);
    session.edit_mut().set_capability(Capability::MlkitOcr, true);
    session.save(&FsIconStore).await.unwrap();

    session.edit_mut().set_capability(Capability::MlkitOcr, false);
    assert!(!session.is_dirty());
    let descriptor = session.synchronize().unwrap();
    assert!(
        descriptor
            .native_libraries
            .contains(&"libmlkit_google_ocr_pipeline.so".to_string())
    );
}

#[tokio::test]
async fn test_save_is_byte_stable() {
    let scripts = tempfile::tempdir().unwrap();
    let mut session = open_loose(scripts.path()).await;
    fill_required(&mut session);
    session.edit_mut().set_capability(Capability::OpenCv, true);
    session.save(&FsIconStore).await.unwrap();

    let path = scripts.path().join("foo_config.json");
    let first = fs::read(&path).unwrap();

    let store = DescriptorStore::new(&path);
    let loaded = store.load().await.unwrap().unwrap();
    store.save(&loaded).await.unwrap();
    assert_eq!(fs::read(&path).unwrap(), first);
}

#[test]
fn test_abi_merge_keeps_existing_order() {
    let existing: OrderedSet<String> = vec!["arm64-v8a".to_string()].into();
    let merged = merge_abis(existing, "arm64-v8a, x86_64");
    assert_eq!(
        merged.as_slice(),
        &["arm64-v8a".to_string(), "x86_64".to_string()]
    );
}

#[tokio::test]
async fn test_dirty_false_right_after_sync_is_persisted() {
    let scripts = tempfile::tempdir().unwrap();
    let session = open_loose(scripts.path()).await;
    let mut edit = session.edit().clone();
    edit.app_name = "Foo".into();

    let persisted = sync(&edit, Descriptor::default()).unwrap();
    assert!(!is_dirty(Some(&persisted), &edit));
    edit.splash_text = "other".into();
    assert!(is_dirty(Some(&persisted), &edit));
    assert!(is_dirty(None, &edit));
}
