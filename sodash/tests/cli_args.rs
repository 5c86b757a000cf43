//! CLI arg parsing tests for sodash
use assert_cmd::Command;

fn run(args: &[&str], xdg: &std::path::Path) -> (bool, String) {
    let out = Command::cargo_bin("sodash")
        .expect("binary built")
        .env("XDG_CONFIG_HOME", xdg)
        .args(args)
        .output()
        .expect("run sodash");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    (out.status.success(), text)
}

#[test]
fn test_help_mentions_short_and_long_flags() {
    let td = tempfile::tempdir().unwrap();
    let (ok, text) = run(&["--help"], td.path());
    assert!(ok, "sodash --help failed\n{text}");
    for flag in [
        "--profile",
        "-P",
        "--save",
        "--config",
        "--interval-ms",
        "--timeout-ms",
        "--dry-run",
        "--verbose",
        "[URL]",
    ] {
        assert!(text.contains(flag), "help text missing {flag}\n{text}");
    }
}

#[test]
fn test_dry_run_prints_defaults() {
    let td = tempfile::tempdir().unwrap();
    let (ok, text) = run(&["--dry-run"], td.path());
    assert!(ok, "dry run failed\n{text}");
    assert!(text.contains("url: http://localhost:5000"), "{text}");
    assert!(text.contains("(default)"), "{text}");
    assert!(text.contains("cpu=5000"), "{text}");
    assert!(text.contains("status=7000"), "{text}");
    assert!(text.contains("profiles: (none)"), "{text}");
}

#[test]
fn test_interval_and_timeout_overrides() {
    let td = tempfile::tempdir().unwrap();
    let (ok, text) = run(
        &[
            "http://10.0.0.5:5000",
            "--interval-ms",
            "1000",
            "--timeout-ms",
            "750",
            "--dry-run",
        ],
        td.path(),
    );
    assert!(ok, "{text}");
    assert!(text.contains("url: http://10.0.0.5:5000 (command line)"), "{text}");
    assert!(text.contains("cpu=1000"), "{text}");
    assert!(text.contains("directory=1000"), "{text}");
    assert!(text.contains("request timeout (ms): 750"), "{text}");
}

#[test]
fn test_bad_url_is_rejected() {
    let td = tempfile::tempdir().unwrap();
    let (ok, text) = run(&["not a url", "--dry-run"], td.path());
    assert!(!ok);
    assert!(text.contains("invalid base url"), "{text}");
}
