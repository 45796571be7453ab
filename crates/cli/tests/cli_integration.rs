use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("tack-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn tack() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tack"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_manifest(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("tack.json");
    fs::write(&path, json).expect("failed to write manifest");
    path
}

fn assert_success(out: &Output, what: &str) {
    assert!(
        out.status.success(),
        "{what} failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
}

const DEPLOY_MANIFEST: &str = r#"{
  "schemaVersion": 1,
  "tasks": [
    {
      "name": "deploy",
      "summary": "Deploy the app",
      "aliases": ["d"],
      "arguments": [{ "name": "env", "possibleValues": ["staging", "prod"] }],
      "options": [
        { "name": "force", "type": "boolean", "aliases": ["-f"], "desc": "Skip checks" },
        { "name": "replicas", "default": 2 },
        { "name": "tags", "type": "array" },
        { "name": "labels", "type": "hash" }
      ]
    },
    {
      "name": "lint",
      "summary": "Lint sources",
      "checkUnknownOptions": true,
      "options": [{ "name": "fix", "type": "boolean" }]
    }
  ]
}"#;

#[test]
fn help_works() {
    let out = tack().arg("--help").output().expect("failed to run tack --help");
    assert_success(&out, "tack --help");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("tack") && stdout.contains("parse") && stdout.contains("serialize"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn init_writes_a_usable_manifest() {
    let dir = make_temp_dir("init");

    let out = tack().arg("init").arg(&dir).output().expect("failed to run tack init");
    assert_success(&out, "tack init");
    let manifest = dir.join("tack.json");
    assert!(manifest.is_file(), "tack.json not created");

    let out = tack()
        .arg("--manifest")
        .arg(&manifest)
        .args(["parse", "greet", "--", "World", "--loud"])
        .output()
        .expect("failed to run tack parse");
    assert_success(&out, "tack parse greet");
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is not JSON");
    assert_eq!(json["arguments"]["name"], "World");
    assert_eq!(json["options"]["loud"], true);
    assert_eq!(json["options"]["times"], 1);

    let out = tack().arg("init").arg(&dir).output().expect("failed to run tack init");
    assert!(!out.status.success(), "second init should refuse to overwrite");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn tasks_lists_manifest_tasks() {
    let dir = make_temp_dir("tasks");
    let manifest = write_manifest(&dir, DEPLOY_MANIFEST);

    let out = tack()
        .arg("--manifest")
        .arg(&manifest)
        .arg("tasks")
        .output()
        .expect("failed to run tack tasks");
    assert_success(&out, "tack tasks");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("deploy ENV [options]"), "{stdout}");
    assert!(stdout.contains("# Deploy the app"), "{stdout}");
    assert!(stdout.contains("# Lint sources"), "{stdout}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn help_renders_options() {
    let dir = make_temp_dir("task-help");
    let manifest = write_manifest(&dir, DEPLOY_MANIFEST);

    let out = tack()
        .arg("--manifest")
        .arg(&manifest)
        .args(["help", "d"])
        .output()
        .expect("failed to run tack help");
    assert_success(&out, "tack help d");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Usage:\n  deploy ENV [options]"), "{stdout}");
    assert!(stdout.contains("-f, [--force], [--no-force]"), "{stdout}");
    assert!(stdout.contains("# Default: 2"), "{stdout}");
    assert!(stdout.contains("# Possible values: staging, prod"), "{stdout}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_prints_options_arguments_and_trailing() {
    let dir = make_temp_dir("parse");
    let manifest = write_manifest(&dir, DEPLOY_MANIFEST);

    let out = tack()
        .arg("--manifest")
        .arg(&manifest)
        .args([
            "parse", "deploy", "--", "prod", "-f", "--replicas", "3", "--tags", "a", "b",
            "--labels", "team:core", "tier:web", "--mystery", "x",
        ])
        .output()
        .expect("failed to run tack parse");
    assert_success(&out, "tack parse deploy");

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is not JSON");
    assert_eq!(json["arguments"]["env"], "prod");
    assert_eq!(json["options"]["force"], true);
    assert_eq!(json["options"]["replicas"], 3);
    assert_eq!(json["options"]["tags"], serde_json::json!(["a", "b"]));
    assert_eq!(json["options"]["labels"]["team"], "core");
    assert_eq!(json["options"]["labels"]["tier"], "web");
    assert_eq!(json["trailing"], serde_json::json!(["--mystery", "x"]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_reads_a_quoted_line() {
    let dir = make_temp_dir("parse-line");
    let manifest = write_manifest(&dir, DEPLOY_MANIFEST);

    let out = tack()
        .arg("--manifest")
        .arg(&manifest)
        .args(["parse", "deploy", "--line", r#"staging --tags "two words" x"#])
        .output()
        .expect("failed to run tack parse --line");
    assert_success(&out, "tack parse --line");

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is not JSON");
    assert_eq!(json["arguments"]["env"], "staging");
    assert_eq!(json["options"]["tags"], serde_json::json!(["two words", "x"]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_failures_exit_non_zero() {
    let dir = make_temp_dir("parse-errors");
    let manifest = write_manifest(&dir, DEPLOY_MANIFEST);

    let cases: [(&[&str], &str); 4] = [
        (&["parse", "deploy", "--", "prod", "--replicas", "many"], "expected numeric value"),
        (&["parse", "deploy", "--", "-f"], "missing required argument: 'env'"),
        (&["parse", "deploy", "--", "qa"], "to be one of staging, prod"),
        (&["parse", "lint", "--", "--fix", "--bogus"], "unknown switch: '--bogus'"),
    ];
    for (args, expected) in cases {
        let out = tack()
            .arg("--manifest")
            .arg(&manifest)
            .args(args)
            .output()
            .expect("failed to run tack parse");
        assert!(!out.status.success(), "{args:?} should fail");
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains(expected), "{args:?}: unexpected stderr:\n{stderr}");
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unknown_task_is_reported() {
    let dir = make_temp_dir("unknown-task");
    let manifest = write_manifest(&dir, DEPLOY_MANIFEST);

    let out = tack()
        .arg("--manifest")
        .arg(&manifest)
        .args(["parse", "publish"])
        .output()
        .expect("failed to run tack parse");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("could not find task 'publish'"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn invalid_manifest_declaration_is_reported() {
    let dir = make_temp_dir("bad-manifest");
    let manifest = write_manifest(
        &dir,
        r#"{ "tasks": [{ "name": "x", "options": [{ "name": "n", "required": true, "default": 1 }] }] }"#,
    );

    let out = tack()
        .arg("--manifest")
        .arg(&manifest)
        .arg("tasks")
        .output()
        .expect("failed to run tack tasks");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid option 'n'"), "{stderr}");
    assert!(stderr.contains("cannot be required and have a default value"), "{stderr}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn serialize_renders_switches() {
    let out = tack()
        .args(["serialize", r#"{"force": true, "quiet": false, "n": 3, "dry_run": "yes", "tags": ["a", "b"]}"#])
        .output()
        .expect("failed to run tack serialize");
    assert_success(&out, "tack serialize");
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim_end(),
        r#"--force -n 3 --dry-run "yes" --tags "a" "b""#
    );
}

#[test]
fn missing_default_manifest_is_explained() {
    let dir = make_temp_dir("no-manifest");
    let out = tack()
        .current_dir(&dir)
        .arg("tasks")
        .output()
        .expect("failed to run tack tasks");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no tack.json found"));
    let _ = fs::remove_dir_all(&dir);
}
