//! # Config Module Unit Tests / Config 模块单元测试
//!
//! Tests parsing and loading of the environment configuration file.
//!
//! 测试环境配置文件的解析和加载。

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use zendev::core::config::{load_environment_config, parse_environment_config};
use zendev::core::environment::ZenDevEnvironment;

#[test]
fn test_minimal_config() {
    let config = parse_environment_config(
        r#"
name = "dev"
root = "/envs/dev"
"#,
    )
    .unwrap();

    assert_eq!(config.name, "dev");
    assert_eq!(config.root, "/envs/dev");
    assert!(config.srcroot.is_none());
    assert!(config.home.is_none());
    assert!(config.repositories.is_empty());
    assert!(config.env.is_empty());
}

#[test]
fn test_full_config() {
    let config = parse_environment_config(
        r#"
name = "feature-x"
root = "/envs/x"
srcroot = "/code"
buildroot = "out/build"
zenhome = "/opt/zenoss"
var_zenoss = "/var/zenoss"
home = "/home/dev"

[[repositories]]
name = "zenpacks/ZenPacks.zenoss.Impact"
path = "zenpacks/impact"
products = ["resmgr", "ucspm"]

[env]
GOPATH = "/code/golang"
"#,
    )
    .unwrap();

    assert_eq!(config.repositories.len(), 1);
    assert_eq!(config.repositories[0].products, ["resmgr", "ucspm"]);
    assert_eq!(config.env["GOPATH"], "/code/golang");

    let env = ZenDevEnvironment::from_config(&config).unwrap();
    assert_eq!(env.src_root(), Path::new("/code"));
    // Relative directories resolve against the root.
    assert_eq!(env.build_root(), Path::new("/envs/x/out/build"));
    assert_eq!(env.zen_home(), Path::new("/opt/zenoss"));
    assert_eq!(
        env.repositories(|_| true)[0].path,
        Path::new("/code/zenpacks/impact")
    );
    assert_eq!(env.env_vars()["GOPATH"], "/code/golang");
}

#[test]
fn test_missing_name_is_rejected() {
    assert!(parse_environment_config(r#"root = "/envs/dev""#).is_err());
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("environment.toml");
    fs::write(&path, "name = \"dev\"\nroot = \"/envs/dev\"\nhome = \"/h\"\n").unwrap();

    let config = load_environment_config(&path).unwrap();
    assert_eq!(config.name, "dev");
    assert_eq!(config.home.as_deref(), Some("/h"));
}

#[test]
fn test_invalid_toml_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "name = \"dev\"\n[[repositories]\n").unwrap();

    let err = load_environment_config(&path).unwrap_err();
    assert!(format!("{err}").contains("broken.toml"));
}
