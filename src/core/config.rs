//! # Environment Configuration / 环境配置
//!
//! The TOML file describing a zendev environment: its name, where its
//! directories live and which repositories it manages.
//!
//! 描述 zendev 环境的 TOML 文件：环境名称、各目录的位置以及它管理的仓库。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::infra::t;

/// Default location of the environment configuration.
pub const DEFAULT_CONFIG_PATH: &str = "~/.zendev/environment.toml";

/// A repository managed by the environment.
/// 环境管理的一个仓库。
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Repository name, e.g. `control-center/serviced`.
    pub name: String,
    /// Checkout path. Relative paths resolve against the source root.
    /// 检出路径。相对路径基于源代码根目录解析。
    pub path: String,
    /// Products this repository's package belongs to. Empty means all.
    /// 此仓库的包所属的产品。为空表示全部。
    #[serde(default)]
    pub products: Vec<String>,
}

/// The whole environment configuration, loaded from a TOML file.
///
/// Directory fields left out default to subdirectories of `root`.
///
/// 从 TOML 文件加载的完整环境配置。
/// 未填写的目录字段默认为 `root` 的子目录。
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct EnvironmentConfig {
    /// Environment name; also the preferred image tag.
    pub name: String,
    pub root: String,
    #[serde(default)]
    pub srcroot: Option<String>,
    #[serde(default)]
    pub buildroot: Option<String>,
    #[serde(default)]
    pub zenhome: Option<String>,
    #[serde(default)]
    pub var_zenoss: Option<String>,
    /// Home directory mounted as the maven cache; defaults to `$HOME`.
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,
    /// Extra variables for every child process.
    /// 传递给每个子进程的额外变量。
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// Loads an environment configuration file.
///
/// # Arguments
/// * `path` - Path to the TOML configuration file
///
/// # Returns
/// The parsed `EnvironmentConfig`, or an error with the offending path
pub fn load_environment_config(path: &Path) -> Result<EnvironmentConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| t!("config.read_failed", path = path.display()))?;
    parse_environment_config(&content)
        .with_context(|| t!("config.parse_failed", path = path.display()))
}

/// Parses the TOML text of an environment configuration.
pub fn parse_environment_config(content: &str) -> Result<EnvironmentConfig> {
    Ok(toml::from_str(content)?)
}
