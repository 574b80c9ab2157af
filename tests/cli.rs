use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const BIN: &str = "kodegen_bundler_codesign";

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.env_remove("MACOS_CODESIGN_IDENTITY")
        .env_remove("MACOS_ENTITLEMENTS_FILE")
        .env("RUST_LOG", "off");
    cmd
}

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

#[test]
fn dry_run_signs_files_then_bundle_once() {
    let output = cmd()
        .args([
            "sign",
            "--base-dir",
            "/out",
            "--identity",
            "Developer ID Application: Example (TEAMID)",
            "--entitlements",
            "/etc/app.entitlements",
            "--dry-run",
            "Foo.app/Contents/MacOS/Foo",
            "Foo.app/Contents/Resources/lib.dylib",
            "standalone.dylib",
            "readme.txt",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Signed 3 files, ignored 1, signed 1 bundles",
        ))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let commands: Vec<&str> = stdout.lines().filter(|l| l.starts_with("codesign ")).collect();

    assert_eq!(commands.len(), 8);
    assert_eq!(commands[0], "codesign --remove-signature /out/Foo.app/Contents/MacOS/Foo");
    assert_eq!(
        commands[1],
        "codesign --timestamp --options runtime --entitlements=/etc/app.entitlements \
         --sign Developer ID Application: Example (TEAMID) /out/Foo.app/Contents/MacOS/Foo"
    );
    assert_eq!(commands[6], "codesign --remove-signature /out/Foo.app");
    assert!(commands[7].ends_with("--sign Developer ID Application: Example (TEAMID) /out/Foo.app"));
    assert!(!stdout.contains("readme.txt"));
}

#[test]
fn dry_run_enumerates_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "Foo.app/Contents/MacOS/Foo");
    touch(dir.path(), "Foo.app/Contents/Info.plist");
    touch(dir.path(), "Foo.app/Contents/Resources/python3.11");
    touch(dir.path(), "notes.txt");

    cmd()
        .args(["sign", "--identity", "-", "--entitlements", "app.entitlements", "--dry-run"])
        .arg("--base-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Signed 2 files, ignored 2, signed 1 bundles",
        ));
}

#[test]
fn identity_can_come_from_environment() {
    cmd()
        .env("MACOS_CODESIGN_IDENTITY", "Env Identity")
        .env("MACOS_ENTITLEMENTS_FILE", "/env/app.entitlements")
        .args(["sign", "--base-dir", "/out", "--dry-run", "lib.so"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "--entitlements=/env/app.entitlements --sign Env Identity /out/lib.so",
        ));
}

#[test]
fn config_file_supplies_identity_and_rules() {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/codesign.toml");

    cmd()
        .args(["sign", "--base-dir", "/out", "--dry-run", "--config"])
        .arg(&fixture)
        .args(["addon.node", "bin/luajit", "readme.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "--sign Developer ID Application: Fixture (TEAMID) /out/addon.node",
        ))
        .stdout(predicate::str::contains("fixtures/fixture.entitlements"))
        .stdout(predicate::str::contains(
            "Signed 2 files, ignored 1, signed 0 bundles",
        ));
}

#[test]
fn missing_identity_fails() {
    cmd()
        .args(["sign", "--base-dir", "/out", "--entitlements", "e.plist", "--dry-run", "a.so"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required argument"));
}

#[test]
fn absolute_file_argument_is_rejected() {
    cmd()
        .args(["classify", "--base-dir", "/out", "/etc/passwd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be relative"));
}

#[test]
fn classify_reports_each_file() {
    cmd()
        .args([
            "classify",
            "--base-dir",
            "/out",
            "App.app/Contents/MacOS/App",
            "App.app/Contents/Resources/pythonX",
            "readme.txt",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "executable App.app/Contents/MacOS/App (bundle App.app)",
        ))
        .stdout(predicate::str::contains(
            "eligible   App.app/Contents/Resources/pythonX (bundle App.app)",
        ))
        .stdout(predicate::str::contains("ignored    readme.txt"));
}

#[test]
fn blank_identity_from_config_file_fails() {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/blank-identity.toml");

    cmd()
        .args(["sign", "--base-dir", "/out", "--dry-run", "--config"])
        .arg(&fixture)
        .arg("a.so")
        .assert()
        .failure()
        .stdout(predicate::str::contains("codesign").not())
        .stderr(predicate::str::contains("Signing identity cannot be blank"));
}

#[test]
fn empty_entitlements_from_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("codesign.toml");
    fs::write(&config, "[codesign]\nidentity = \"-\"\nentitlements = \"\"\n").unwrap();

    cmd()
        .args(["sign", "--base-dir", "/out", "--dry-run", "--config"])
        .arg(&config)
        .arg("a.so")
        .assert()
        .failure()
        .stdout(predicate::str::contains("codesign").not())
        .stderr(predicate::str::contains("Entitlements must name a plist file"));
}

#[test]
fn empty_entitlements_flag_fails() {
    cmd()
        .args(["sign", "--base-dir", "/out", "--identity", "-", "--entitlements", "", "--dry-run", "a.so"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("codesign").not());
}
