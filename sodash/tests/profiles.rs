//! Tests for profile load/save and resolution through the binary (non-interactive paths only)
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

fn run_sodash(xdg: &Path, args: &[&str]) -> (bool, String) {
    let output = Command::cargo_bin("sodash")
        .expect("binary built")
        .env("XDG_CONFIG_HOME", xdg)
        .args(args)
        .output()
        .expect("run sodash");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (output.status.success(), text)
}

fn config_path(xdg: &Path) -> PathBuf {
    xdg.join("sodash").join("config.json")
}

#[test]
fn test_profile_created_on_first_use() {
    let td = tempfile::tempdir().unwrap();
    let (ok, out) = run_sodash(
        td.path(),
        &["--profile", "unittest", "http://example:1", "--dry-run"],
    );
    assert!(ok, "{out}");
    let data = fs::read_to_string(config_path(td.path())).expect("config.json created");
    assert!(
        data.contains("unittest") && data.contains("http://example:1"),
        "config.json missing profile entry: {data}"
    );
}

#[test]
fn test_profile_overwrite_only_with_save() {
    let td = tempfile::tempdir().unwrap();
    let (ok, out) = run_sodash(td.path(), &["-P", "prod", "http://one:5000", "--dry-run"]);
    assert!(ok, "{out}");
    let first = fs::read_to_string(config_path(td.path())).unwrap();

    // Identical input leaves the file alone
    run_sodash(td.path(), &["-P", "prod", "http://one:5000", "--dry-run"]);
    let second = fs::read_to_string(config_path(td.path())).unwrap();
    assert_eq!(first, second, "config changed despite identical input");

    // A different URL is used for this run but not persisted
    let (_, out) = run_sodash(td.path(), &["-P", "prod", "http://two:5000", "--dry-run"]);
    assert!(out.contains("url: http://two:5000"), "{out}");
    let third = fs::read_to_string(config_path(td.path())).unwrap();
    assert!(!third.contains("two"), "URL persisted without --save: {third}");

    let (_, _) = run_sodash(
        td.path(),
        &["-P", "prod", "--save", "http://two:5000", "--dry-run"],
    );
    let fourth = fs::read_to_string(config_path(td.path())).unwrap();
    assert!(fourth.contains("http://two:5000"), "updated URL not written: {fourth}");
}

#[test]
fn test_profile_loaded_by_name() {
    let td = tempfile::tempdir().unwrap();
    run_sodash(td.path(), &["-P", "lab", "http://lab:8080", "--dry-run"]);
    let (ok, out) = run_sodash(td.path(), &["-P", "lab", "--dry-run"]);
    assert!(ok, "{out}");
    assert!(out.contains("url: http://lab:8080 (profile 'lab')"), "{out}");
    assert!(out.contains("profiles: lab"), "{out}");
}

#[test]
fn test_unknown_profile_fails() {
    let td = tempfile::tempdir().unwrap();
    let (ok, out) = run_sodash(td.path(), &["-P", "missing", "--dry-run"]);
    assert!(!ok);
    assert!(out.contains("profile 'missing' does not exist"), "{out}");
}

#[test]
fn test_explicit_config_file_and_polling_section() {
    let td = tempfile::tempdir().unwrap();
    let cfg = td.path().join("custom.json");
    fs::write(
        &cfg,
        r#"{"polling":{"cpu_ms":2500},"table":{"page_size":20}}"#,
    )
    .unwrap();
    let (ok, out) = run_sodash(
        td.path(),
        &["--config", cfg.to_str().unwrap(), "--dry-run"],
    );
    assert!(ok, "{out}");
    assert!(out.contains("cpu=2500"), "{out}");
    assert!(out.contains("memory=5000"), "{out}");
    assert!(out.contains("page size 20"), "{out}");
    assert!(!config_path(td.path()).exists());
}
