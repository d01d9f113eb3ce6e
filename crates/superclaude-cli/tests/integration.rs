#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

fn superclaude(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("superclaude").unwrap();
    cmd.current_dir(dir.path())
        .env("SUPERCLAUDE_INSTALL_DIR", install_dir(dir))
        .env("SUPERCLAUDE_SOURCE_DIR", dir.path().join("SuperClaude"))
        .env_remove("RUST_LOG");
    cmd
}

fn install_dir(dir: &TempDir) -> PathBuf {
    dir.path().join("home/.claude")
}

fn write_source(dir: &TempDir, rel: &str, content: &str) {
    let path = dir.path().join("SuperClaude").join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn settings(dir: &TempDir) -> Value {
    let raw = std::fs::read_to_string(install_dir(dir).join("settings.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

// ---------------------------------------------------------------------------
// superclaude install
// ---------------------------------------------------------------------------

#[test]
fn install_registers_scripts_and_hooks_placeholder() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "Scripts/status.sh", "#!/bin/bash\necho ok\n");

    superclaude(&dir).arg("install").assert().success();

    assert!(install_dir(&dir).join("scripts/status.sh").is_file());
    assert!(install_dir(&dir).join("hooks/PLACEHOLDER.py").is_file());

    let s = settings(&dir);
    assert_eq!(s["components"]["scripts"]["version"], "1.0.0");
    assert_eq!(s["components"]["scripts"]["files_count"], 1);
    assert_eq!(s["components"]["hooks"]["status"], "placeholder");
    assert_eq!(s["components"]["hooks"]["files_count"], 0);
}

#[cfg(unix)]
#[test]
fn installed_scripts_are_executable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    write_source(&dir, "Scripts/status.sh", "#!/bin/bash\necho ok\n");
    superclaude(&dir).args(["install", "scripts"]).assert().success();

    let mode = std::fs::metadata(install_dir(&dir).join("scripts/status.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_ne!(mode & 0o111, 0);
}

#[test]
fn install_json_reports_each_component() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "Scripts/status.sh", "echo ok");

    let output = superclaude(&dir)
        .args(["install", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = stdout_json(&output.stdout);
    assert_eq!(report["action"], "install");
    let components = report["components"].as_array().unwrap();
    assert_eq!(components.len(), 2);
    assert!(components.iter().all(|c| c["status"] == "succeeded"));
}

#[test]
fn install_fails_without_scripts_source() {
    let dir = TempDir::new().unwrap();
    superclaude(&dir)
        .args(["install", "scripts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: install failed for: scripts"));
}

#[test]
fn install_rejects_unknown_component() {
    let dir = TempDir::new().unwrap();
    superclaude(&dir)
        .args(["install", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown component: bogus"));
}

#[test]
fn install_with_hook_source_registers_stop_hook() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "Hooks/anti_sycophant.py", "print('hook')\n");

    superclaude(&dir).args(["install", "hooks"]).assert().success();

    let s = settings(&dir);
    assert_eq!(s["components"]["hooks"]["status"], "installed");
    let command = s["hooks"]["Stop"][0]["hooks"][0]["command"].as_str().unwrap();
    assert!(command.ends_with("anti_sycophant.py"));
    assert_eq!(s["hooks"]["Stop"][0]["hooks"][0]["timeout"], 5);
}

#[test]
fn install_uses_configured_stop_timeout() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "Hooks/anti_sycophant.py", "print('hook')\n");
    std::fs::create_dir_all(install_dir(&dir)).unwrap();
    std::fs::write(
        install_dir(&dir).join("superclaude.yaml"),
        "hooks:\n  stop_timeout: 12\n",
    )
    .unwrap();

    superclaude(&dir).args(["install", "hooks"]).assert().success();
    assert_eq!(settings(&dir)["hooks"]["Stop"][0]["hooks"][0]["timeout"], 12);
}

#[test]
fn install_keeps_foreign_settings_keys() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(install_dir(&dir)).unwrap();
    std::fs::write(
        install_dir(&dir).join("settings.json"),
        r#"{"theme": "dark", "permissions": {"allow": ["Bash"]}}"#,
    )
    .unwrap();

    superclaude(&dir).args(["install", "hooks"]).assert().success();

    let s = settings(&dir);
    assert_eq!(s["theme"], "dark");
    assert_eq!(s["permissions"]["allow"][0], "Bash");
    assert_eq!(s["components"]["hooks"]["version"], "3.0.0");
}

#[test]
fn install_and_uninstall_tolerate_foreign_component_records() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "Scripts/status.sh", "echo ok");
    std::fs::create_dir_all(install_dir(&dir)).unwrap();
    std::fs::write(
        install_dir(&dir).join("settings.json"),
        r#"{"components": {"core": {"version": "3.0.0", "installed": true,
            "status": "partial", "installed_at": "2025-01-01T12:00:00.123456"}}}"#,
    )
    .unwrap();

    superclaude(&dir).arg("install").assert().success();
    superclaude(&dir).arg("uninstall").assert().success();

    let s = settings(&dir);
    assert_eq!(s["components"]["core"]["status"], "partial");
    assert!(s["components"].get("scripts").is_none());
}

#[test]
fn install_logs_progress_by_default() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "Scripts/status.sh", "echo ok");

    superclaude(&dir)
        .args(["install", "scripts"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Installing Scripts component"));
}

#[test]
fn rust_log_overrides_default_level() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "Scripts/status.sh", "echo ok");

    superclaude(&dir)
        .env("RUST_LOG", "error")
        .args(["install", "scripts"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Installing Scripts component").not());
}

// ---------------------------------------------------------------------------
// superclaude validate / list
// ---------------------------------------------------------------------------

#[test]
fn validate_before_install_fails() {
    let dir = TempDir::new().unwrap();
    superclaude(&dir)
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("scripts: invalid"))
        .stdout(predicate::str::contains("Scripts directory missing"))
        .stderr(predicate::str::contains("validation failed for: hooks, scripts"));
}

#[test]
fn validate_after_install_succeeds() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "Scripts/status.sh", "echo ok");
    superclaude(&dir).arg("install").assert().success();

    superclaude(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("hooks: valid"))
        .stdout(predicate::str::contains("scripts: valid"));
}

#[test]
fn list_json_shows_install_state() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "Scripts/status.sh", "echo ok");

    let output = superclaude(&dir).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    let items = stdout_json(&output.stdout);
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 2);

    let scripts = items.iter().find(|i| i["component"] == "scripts").unwrap();
    assert_eq!(scripts["status"], "implemented");
    assert_eq!(scripts["files"][0], "status.sh");
    assert!(scripts["installed_version"].is_null());

    let hooks = items.iter().find(|i| i["component"] == "hooks").unwrap();
    assert_eq!(hooks["status"], "placeholder");
    assert_eq!(hooks["estimated_size"], 10240);
}

#[test]
fn list_table_has_header() {
    let dir = TempDir::new().unwrap();
    superclaude(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("COMPONENT"))
        .stdout(predicate::str::contains("hooks"));
}

// ---------------------------------------------------------------------------
// superclaude update / uninstall
// ---------------------------------------------------------------------------

#[test]
fn update_at_current_version_is_noop() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "Scripts/status.sh", "echo ok");
    superclaude(&dir).arg("install").assert().success();
    let before = settings(&dir);

    superclaude(&dir).arg("update").assert().success();
    assert_eq!(settings(&dir), before);
}

#[test]
fn update_replaces_outdated_scripts() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "Scripts/status.sh", "echo v1");
    superclaude(&dir).args(["install", "scripts"]).assert().success();

    let path = install_dir(&dir).join("settings.json");
    let mut s = settings(&dir);
    s["components"]["scripts"]["version"] = "0.9.0".into();
    std::fs::write(&path, serde_json::to_string(&s).unwrap()).unwrap();
    write_source(&dir, "Scripts/status.sh", "echo v2");

    superclaude(&dir).args(["update", "scripts"]).assert().success();

    let installed = install_dir(&dir).join("scripts/status.sh");
    assert_eq!(std::fs::read_to_string(installed).unwrap(), "echo v2");
    assert!(!install_dir(&dir).join("scripts/status.sh.backup").exists());
    assert_eq!(settings(&dir)["components"]["scripts"]["version"], "1.0.0");
}

#[test]
fn uninstall_removes_everything_installed() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "Scripts/status.sh", "echo ok");
    write_source(&dir, "Hooks/anti_sycophant.py", "print('hook')\n");
    superclaude(&dir).arg("install").assert().success();

    superclaude(&dir).arg("uninstall").assert().success();

    assert!(!install_dir(&dir).join("scripts").exists());
    assert!(!install_dir(&dir).join("hooks").exists());
    let s = settings(&dir);
    assert!(s.get("components").is_none());
    assert!(s.get("hooks").is_none());
}

// ---------------------------------------------------------------------------
// superclaude optimize
// ---------------------------------------------------------------------------

#[test]
fn optimize_prints_banners() {
    let dir = TempDir::new().unwrap();
    superclaude(&dir)
        .args(["optimize", "add", "a", "login", "page"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== ORIGINAL REQUEST ===\nadd a login page\n"))
        .stdout(predicate::str::contains("=== REQUEST TYPE DETECTED ===\nfeature\n"))
        .stdout(predicate::str::contains("User request: add a login page"))
        .stdout(predicate::str::ends_with("=== EXECUTING NOW ===\n"));
}

#[test]
fn optimize_json_uses_project_context() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("Cargo.toml"), "[package]\n").unwrap();

    let output = superclaude(&dir)
        .args(["--json", "optimize", "why is the build failing"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let prompt = stdout_json(&output.stdout);
    // "build" is a feature keyword and is checked before "why".
    assert_eq!(prompt["type"], "feature");
    assert_eq!(prompt["original"], "why is the build failing");
    assert!(prompt["scaffolded"]
        .as_str()
        .unwrap()
        .contains("Project type: Rust"));
}

#[test]
fn optimize_requires_request() {
    let dir = TempDir::new().unwrap();
    superclaude(&dir).arg("optimize").assert().failure();
}

// ---------------------------------------------------------------------------
// superclaude hook anti-sycophant
// ---------------------------------------------------------------------------

fn transcript(dir: &TempDir, reply: &str) -> String {
    let path = dir.path().join("session.jsonl");
    let lines = [
        serde_json::json!({"type": "user", "message": {"role": "user", "content": "is this right?"}}),
        serde_json::json!({"type": "assistant", "message": {"role": "assistant", "content": [
            {"type": "text", "text": reply}
        ]}}),
    ];
    let body: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    std::fs::write(&path, body.join("\n")).unwrap();
    path.display().to_string()
}

#[test]
fn hook_blocks_sycophantic_reply() {
    let dir = TempDir::new().unwrap();
    let path = transcript(&dir, "You're absolutely right, I'll fix it.");
    let payload = serde_json::json!({"transcript_path": path, "session_id": "s1"});

    let output = superclaude(&dir)
        .args(["hook", "anti-sycophant"])
        .write_stdin(payload.to_string())
        .output()
        .unwrap();
    assert!(output.status.success());
    let decision = stdout_json(&output.stdout);
    assert_eq!(decision["decision"], "block");
    assert!(decision["reason"]
        .as_str()
        .unwrap()
        .contains("Detected phrases: You're absolutely right"));
}

#[test]
fn hook_passes_clean_reply_and_active_loop() {
    let dir = TempDir::new().unwrap();
    let path = transcript(&dir, "The cache is rebuilt on startup.");
    superclaude(&dir)
        .args(["hook", "anti-sycophant"])
        .write_stdin(serde_json::json!({"transcript_path": path}).to_string())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let path = transcript(&dir, "Great catch!");
    superclaude(&dir)
        .args(["hook", "anti-sycophant"])
        .write_stdin(
            serde_json::json!({"transcript_path": path, "stop_hook_active": true}).to_string(),
        )
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn hook_warns_when_blocking_disabled() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(install_dir(&dir)).unwrap();
    std::fs::write(
        install_dir(&dir).join("superclaude.yaml"),
        "sycophancy:\n  block_and_revise: false\n",
    )
    .unwrap();
    let path = transcript(&dir, "Great catch!");

    superclaude(&dir)
        .args(["hook", "anti-sycophant"])
        .write_stdin(serde_json::json!({"transcript_path": path}).to_string())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Sycophantic language detected: Great catch"));
}

#[test]
fn hook_rejects_invalid_payload() {
    let dir = TempDir::new().unwrap();
    superclaude(&dir)
        .args(["hook", "anti-sycophant"])
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error parsing JSON input"));
}
