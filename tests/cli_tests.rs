use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Running `test` without any target flag is a usage error, reported before
/// the configuration is even read.
///
/// 不带任何目标标志运行 `test` 是用法错误，在读取配置之前就会报告。
#[test]
fn test_no_targets_fails() {
    let mut cmd = Command::cargo_bin("zendev").unwrap();
    cmd.args(["--lang", "en", "--config", "/nonexistent/env.toml", "test"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No tests were specified."));
}

/// A selected target with an unreadable configuration fails with the path.
///
/// 选择了目标但配置不可读时，失败信息包含该路径。
#[test]
fn test_missing_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.toml");

    let mut cmd = Command::cargo_bin("zendev").unwrap();
    cmd.args(["--lang", "en", "--config"])
        .arg(&missing)
        .args(["test", "-c"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read environment configuration"));
}

/// `env` prints the configured environment.
///
/// `env` 打印已配置的环境。
#[test]
fn test_env_prints_environment() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("environment.toml");
    fs::write(
        &config,
        r#"
name = "nightly"
root = "/envs/nightly"
home = "/home/tester"

[[repositories]]
name = "control-center/serviced"
path = "serviced"
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("zendev").unwrap();
    cmd.args(["--lang", "en", "env", "--config"]).arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("nightly"))
        .stdout(predicate::str::contains("/envs/nightly/src/serviced"));
}

#[test]
fn test_help_lists_target_flags() {
    let mut cmd = Command::cargo_bin("zendev").unwrap();
    cmd.args(["--lang", "en", "test", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--zenoss-devimg"))
        .stdout(predicate::str::contains("--serviced-smoke"))
        .stdout(predicate::str::contains("--use-existing"));
}
