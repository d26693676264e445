//! Integration tests for the `script_build_config` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

/// Command with an empty settings file so the user's own settings never leak in
fn cli(dir: &Path) -> Command {
    let settings = dir.join("settings.toml");
    if !settings.exists() {
        fs::write(&settings, "").unwrap();
    }
    let mut cmd = Command::cargo_bin("script_build_config").unwrap();
    cmd.env("SCRIPT_BUILD_SETTINGS", &settings)
        .env_remove("SCRIPT_PACKAGER");
    cmd
}

fn loose_script(dir: &Path) -> std::path::PathBuf {
    let script = dir.join("foo.js");
    fs::write(&script, "toast('hi')").unwrap();
    script
}

#[test]
fn test_configure_writes_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let script = loose_script(dir.path());

    cli(dir.path())
        .arg("configure")
        .arg(&script)
        .args(["--name", "Foo", "--package-id", "com.example.foo", "--with", "opencv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Descriptor saved"));

    let json = fs::read_to_string(dir.path().join("foo_config.json")).unwrap();
    assert!(json.contains("\"packageId\": \"com.example.foo\""));
    assert!(json.contains("libopencv_java4.so"));
}

#[test]
fn test_configure_rejects_bad_package_id() {
    let dir = tempfile::tempdir().unwrap();
    let script = loose_script(dir.path());

    cli(dir.path())
        .arg("configure")
        .arg(&script)
        .args(["--name", "Foo", "--package-id", "com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid package id"));

    assert!(!dir.path().join("foo_config.json").exists());
}

#[test]
fn test_configure_rejects_bad_version_code() {
    let dir = tempfile::tempdir().unwrap();
    let script = loose_script(dir.path());

    cli(dir.path())
        .arg("configure")
        .arg(&script)
        .args(["--name", "Foo", "--package-id", "com.example.foo"])
        .args(["--version-code", "12a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("12a"));
}

#[test]
fn test_with_and_without_same_capability_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = loose_script(dir.path());

    cli(dir.path())
        .arg("configure")
        .arg(&script)
        .args(["--with", "draw-overlay", "--without", "draw-overlay"])
        .assert()
        .code(2);
}

#[test]
fn test_status_reports_mode_and_problems() {
    let dir = tempfile::tempdir().unwrap();
    let script = loose_script(dir.path());

    cli(dir.path())
        .arg("status")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("single-file"))
        .stdout(predicate::str::contains("Required field 'app name' is empty"));
}

#[test]
fn test_show_json_after_configure() {
    let dir = tempfile::tempdir().unwrap();
    let script = loose_script(dir.path());

    cli(dir.path())
        .arg("show")
        .arg(&script)
        .arg("--json")
        .assert()
        .success()
        .stdout("null\n");

    cli(dir.path())
        .arg("configure")
        .arg(&script)
        .args(["--name", "Foo", "--package-id", "com.example.foo"])
        .assert()
        .success();

    cli(dir.path())
        .arg("show")
        .arg(&script)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Foo\""));
}

#[test]
fn test_promote_creates_project_directory() {
    let dir = tempfile::tempdir().unwrap();
    let script = loose_script(dir.path());

    cli(dir.path())
        .arg("configure")
        .arg(&script)
        .args(["--name", "Foo", "--package-id", "com.example.foo"])
        .assert()
        .success();

    cli(dir.path())
        .arg("promote")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Promoted to project"));

    let project = dir.path().join("foo");
    assert!(project.join("foo.js").is_file());
    assert!(project.join("project.json").is_file());
    assert!(!script.exists());
    assert!(!dir.path().join("foo_config.json").exists());

    cli(dir.path())
        .arg("status")
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("project"));
}

#[test]
fn test_build_without_packager_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let script = loose_script(dir.path());

    cli(dir.path())
        .arg("configure")
        .arg(&script)
        .args(["--name", "Foo", "--package-id", "com.example.foo"])
        .assert()
        .success();

    cli(dir.path())
        .arg("build")
        .arg(&script)
        .args(["--packager", "definitely-not-a-packager-xyz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[cfg(unix)]
#[test]
fn test_build_with_script_packager_reports_artifact() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let script = loose_script(dir.path());
    let packager = dir.path().join("fake-packager");
    fs::write(
        &packager,
        "#!/bin/sh\nprintf 'apk' > \"$2/app.apk\"\necho packaging\necho \"$2/app.apk\"\n",
    )
    .unwrap();
    fs::set_permissions(&packager, fs::Permissions::from_mode(0o755)).unwrap();

    cli(dir.path())
        .arg("configure")
        .arg(&script)
        .args(["--name", "Foo", "--package-id", "com.example.foo"])
        .assert()
        .success();

    cli(dir.path())
        .arg("build")
        .arg(&script)
        .arg("--packager")
        .arg(&packager)
        .assert()
        .success()
        .stdout(predicate::str::contains("Build succeeded"))
        .stdout(predicate::str::contains("size: 3 bytes"));

    assert!(dir.path().join("app.apk").is_file());
}
