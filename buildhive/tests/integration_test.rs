use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

fn create_monorepo(root: &Path) {
    let packages = root.join("packages");
    for name in ["hive-lib", "alpha", "beta"] {
        let dir = packages.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("package.json"),
            format!(r#"{{"name": "{}", "version": "1.0.0"}}"#, name),
        )
        .unwrap();
    }
}

fn get_buildhive_binary() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.join("target").join("debug").join("buildhive")
}

#[test]
#[ignore]
fn test_scan_command_lists_roles() {
    let temp_dir = TempDir::new().unwrap();
    create_monorepo(temp_dir.path());

    let output = Command::new(get_buildhive_binary())
        .arg("--root")
        .arg(temp_dir.path())
        .arg("scan")
        .output()
        .expect("Failed to execute buildhive scan");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("hive-lib"));
    assert!(stdout.contains("shared-library"));
    assert!(stdout.contains("alpha"));
    assert!(stdout.contains("beta"));
}

#[test]
#[ignore]
fn test_scan_command_json_output() {
    let temp_dir = TempDir::new().unwrap();
    create_monorepo(temp_dir.path());

    let output = Command::new(get_buildhive_binary())
        .arg("--root")
        .arg(temp_dir.path())
        .arg("scan")
        .arg("--json")
        .output()
        .expect("Failed to execute buildhive scan --json");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let listing: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(listing["shared"]["name"], "hive-lib");
    assert_eq!(listing["platforms"].as_array().unwrap().len(), 2);
}

#[test]
#[ignore]
fn test_deploy_refuses_without_config() {
    let temp_dir = TempDir::new().unwrap();
    create_monorepo(temp_dir.path());

    let output = Command::new(get_buildhive_binary())
        .arg("--root")
        .arg(temp_dir.path())
        .arg("deploy")
        .output()
        .expect("Failed to execute buildhive deploy");

    assert!(!output.status.success());
}
