use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn knowlens(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("knowlens").unwrap();
    cmd.arg("--path").arg(root).env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "src/cli/index.ts", "import { login } from '../services/auth';\n");
    write(root, "src/services/auth.ts", "import { cfg } from '../lib/config';\n");
    write(root, "src/services/user.ts", "export const user = 1;\n");
    write(root, "src/lib/config.ts", "export const cfg = {};\n");
    write(root, "src/types/index.ts", "export type Id = string;\n");
    write(root, ".env", "SECRET=1\n");
    dir
}

#[test]
fn test_commands_require_config() {
    let dir = TempDir::new().unwrap();

    knowlens(dir.path())
        .arg("steer")
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_NOT_FOUND"))
        .stderr(predicate::str::contains("knowlens init"));
}

#[test]
fn test_init_twice_fails() {
    let dir = TempDir::new().unwrap();

    knowlens(dir.path())
        .args(["init", "--name", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".knowlens.toml"));

    let config = fs::read_to_string(dir.path().join(".knowlens.toml")).unwrap();
    assert!(config.contains("name = \"demo\""));

    knowlens(dir.path())
        .args(["init", "--name", "demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ALREADY_EXISTS"));
}

#[test]
fn test_full_workflow() {
    let dir = sample_project();
    let root = dir.path();
    let kb = root.join("docs/ai-knowledge");

    knowlens(root).args(["init", "--name", "demo"]).assert().success();

    knowlens(root)
        .arg("steer")
        .assert()
        .success()
        .stdout(predicate::str::contains("pragmatic"));
    assert!(kb.join("module-map.yaml").exists());
    assert!(kb.join("architecture.md").exists());

    knowlens(root).arg("generate").assert().success();
    let services = kb.join("modules/services/README.md");
    assert!(services.exists());
    assert!(kb.join("_index.md").exists());

    // hand-written notes survive regeneration
    let doc = fs::read_to_string(&services).unwrap();
    let start_marker = "<!-- knowlens:user-start -->";
    let start = doc.find(start_marker).unwrap() + start_marker.len();
    let end = doc.find("<!-- knowlens:user-end -->").unwrap();
    fs::write(
        &services,
        format!("{}\nServices own all IO.\n{}", &doc[..start], &doc[end..]),
    )
    .unwrap();

    write(root, "delta-spec.md", "## MODIFIED\n### REQ-SERVICES-001: add accounts\n\n## REMOVED\n### REQ-CLI-001: drop the cli\n");
    knowlens(root)
        .args(["update", "--delta"])
        .arg(root.join("delta-spec.md"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Deprecated"));

    let doc = fs::read_to_string(&services).unwrap();
    assert!(doc.contains("Services own all IO."));

    let cli_doc = fs::read_to_string(kb.join("modules/cli/README.md")).unwrap();
    assert!(cli_doc.starts_with("> **DEPRECATED**: This module was removed. Reason: drop the cli"));

    let registry = fs::read_to_string(kb.join("module-map.yaml")).unwrap();
    assert!(!registry.contains("name: cli"));
    assert!(registry.contains("name: services"));
}

#[test]
fn test_steer_json_output() {
    let dir = sample_project();
    let root = dir.path();
    knowlens(root).args(["init", "--name", "demo"]).assert().success();

    let output = knowlens(root)
        .args(["steer", "--dry-run", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["command"], "steer");
    assert_eq!(value["result"]["architecture"], "pragmatic");
    assert_eq!(value["result"]["file_count"], 5);
    assert_eq!(value["result"]["dry_run"], true);
    assert!(!root.join("docs/ai-knowledge").exists());
}

#[test]
fn test_generate_without_registry() {
    let dir = sample_project();
    let root = dir.path();
    knowlens(root).args(["init", "--name", "demo"]).assert().success();

    knowlens(root)
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PREREQUISITE_ERROR"))
        .stderr(predicate::str::contains("knowlens steer"));
}

#[test]
fn test_delta_command() {
    let dir = sample_project();
    let root = dir.path();
    knowlens(root).args(["init", "--name", "demo"]).assert().success();
    write(root, "change.md", "## ADDED\n### REQ-API-MIDDLEWARE-001: add limiter\n");

    let output = knowlens(root)
        .args(["delta", "--json"])
        .arg(root.join("change.md"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["result"]["added"][0]["module"], "api-middleware");
    assert_eq!(value["result"]["affected_modules"][0], "api-middleware");
}

#[test]
fn test_update_requires_delta_or_modules() {
    let dir = TempDir::new().unwrap();
    knowlens(dir.path()).arg("update").assert().failure();
}

#[test]
fn test_knowledge_init() {
    let dir = sample_project();
    let root = dir.path();
    let kb = root.join("docs/ai-knowledge");
    write(root, "package.json", r#"{"dependencies": {"commander": "^12.0.0"}}"#);
    knowlens(root).args(["init", "--name", "demo"]).assert().success();

    let output = knowlens(root)
        .args(["knowledge", "init", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["command"], "knowledge-init");
    assert_eq!(value["result"]["total_files"], 6);
    assert_eq!(value["result"]["tech_stack"]["language"], "javascript");
    assert_eq!(value["result"]["entry_points"][0], "src/cli/index.ts");
    assert_eq!(value["result"]["dependencies"][0]["name"], "commander");

    let raw_scan = fs::read_to_string(kb.join("raw-scan.md")).unwrap();
    assert!(raw_scan.contains("| commander | ^12.0.0 |"));
    assert!(!raw_scan.contains(".env"));
    assert!(kb.join("_index.md").exists());
    assert!(kb.join("_conventions.md").exists());
    assert!(!kb.join("modules").exists());

    // the skeletons are left alone on a second run
    fs::write(kb.join("_conventions.md"), "# Our Conventions\n").unwrap();
    knowlens(root)
        .args(["knowledge", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("raw-scan.md"));
    assert_eq!(
        fs::read_to_string(kb.join("_conventions.md")).unwrap(),
        "# Our Conventions\n"
    );
}
