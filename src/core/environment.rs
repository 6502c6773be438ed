//! # Environment Context / 环境上下文
//!
//! A read-only view of a zendev environment: its name, directories, the
//! variables every child process receives and the repositories it manages.
//! The orchestrator only ever reads it.
//!
//! zendev 环境的只读视图：名称、目录、每个子进程接收的变量以及它管理的仓库。
//! 编排器只读取它。

use anyhow::{Context, Result, anyhow};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::config::{EnvironmentConfig, load_environment_config};
use crate::core::models::OrchestrationError;
use crate::infra::fs::{expand_path, resolve_against};
use crate::infra::t;

pub const SRCROOT: &str = "SRCROOT";
pub const ZENHOME: &str = "ZENHOME";
pub const VAR_ZENOSS: &str = "VAR_ZENOSS";
pub const HOME: &str = "HOME";

const PACKAGE_PREFIX: &str = "ZenPacks.";

/// A repository checked out in the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub path: PathBuf,
    pub products: Vec<String>,
}

impl Repository {
    /// The package identifier carried by this repository, if any: the last
    /// segment of its name when that segment starts with `ZenPacks.`.
    ///
    /// 此仓库携带的包标识符（如果有）：名称的最后一段以 `ZenPacks.` 开头时即为该段。
    pub fn package_id(&self) -> Option<&str> {
        let last = self.name.rsplit('/').next()?;
        last.starts_with(PACKAGE_PREFIX).then_some(last)
    }

    /// Whether the repository is part of `product`.
    pub fn belongs_to(&self, product: &str) -> bool {
        self.products.is_empty() || self.products.iter().any(|p| p == product)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZenDevEnvironment {
    name: String,
    src_root: PathBuf,
    build_root: PathBuf,
    zen_home: PathBuf,
    var_zenoss: PathBuf,
    home: PathBuf,
    repositories: Vec<Repository>,
    extra_env: BTreeMap<String, String>,
}

impl ZenDevEnvironment {
    /// Loads the configuration at `path` and builds the environment from it.
    pub fn load(path: &Path) -> Result<Self> {
        let config = load_environment_config(path)?;
        Self::from_config(&config)
    }

    /// Builds the environment, expanding `~` and `$VAR` in every path and
    /// filling in the default directory layout below `root`.
    ///
    /// Path-valued entries of the `[env]` table (`SRCROOT`, `ZENHOME`,
    /// `VAR_ZENOSS`, `HOME`) take precedence over the matching fields. They are
    /// expanded and resolved against `root` like the fields, so the mounts, the
    /// repositories and the child environment all see the same absolute paths.
    ///
    /// 构建环境：展开每个路径中的 `~` 和 `$VAR`，并在 `root` 下补全默认目录布局。
    /// `[env]` 表中的路径型条目优先于对应字段，并与字段一样被展开并相对 `root` 解析。
    pub fn from_config(config: &EnvironmentConfig) -> Result<Self> {
        let root = expand_path(&config.root)?;
        let root = std::path::absolute(&root)
            .with_context(|| t!("config.root_unresolved", path = root.display()))?;

        let mut extra_env = config.env.clone();
        let mut take_override =
            |name: &str| extra_env.remove(name).filter(|value| !value.is_empty());
        let srcroot = take_override(SRCROOT).or_else(|| config.srcroot.clone());
        let zenhome = take_override(ZENHOME).or_else(|| config.zenhome.clone());
        let var_zenoss = take_override(VAR_ZENOSS).or_else(|| config.var_zenoss.clone());
        let home = take_override(HOME).or_else(|| config.home.clone());

        let dir = |value: &Option<String>, default: &str| -> Result<PathBuf> {
            match value {
                Some(raw) => Ok(resolve_against(&root, &expand_path(raw)?)),
                None => Ok(root.join(default)),
            }
        };

        let src_root = dir(&srcroot, "src")?;
        let build_root = dir(&config.buildroot, "build")?;
        let zen_home = dir(&zenhome, "zenhome")?;
        let var_zenoss = dir(&var_zenoss, "var_zenoss")?;
        let home = match &home {
            Some(raw) => resolve_against(&root, &expand_path(raw)?),
            None => std::env::var_os(HOME)
                .map(PathBuf::from)
                .filter(|path| path.is_absolute())
                .ok_or_else(|| anyhow!(OrchestrationError::MissingVariable { name: HOME.into() }))
                .context(t!("config.home_unknown"))?,
        };

        let repositories = config
            .repositories
            .iter()
            .map(|repo| {
                Ok(Repository {
                    name: repo.name.clone(),
                    path: resolve_against(&src_root, &expand_path(&repo.path)?),
                    products: repo.products.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: config.name.clone(),
            src_root,
            build_root,
            zen_home,
            var_zenoss,
            home,
            repositories,
            extra_env,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn src_root(&self) -> &Path {
        &self.src_root
    }

    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    pub fn zen_home(&self) -> &Path {
        &self.zen_home
    }

    pub fn var_zenoss(&self) -> &Path {
        &self.var_zenoss
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Variables layered over the environment of every child process: the
    /// resolved directories plus the remaining entries of the `[env]` table.
    ///
    /// 叠加到每个子进程环境上的变量：解析后的目录加上 `[env]` 表中的其余条目。
    pub fn env_vars(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        vars.insert(SRCROOT.to_string(), self.src_root.display().to_string());
        vars.insert(ZENHOME.to_string(), self.zen_home.display().to_string());
        vars.insert(VAR_ZENOSS.to_string(), self.var_zenoss.display().to_string());
        vars.insert(HOME.to_string(), self.home.display().to_string());
        vars.extend(self.extra_env.clone());
        vars
    }

    /// Looks up a path-valued variable from [`env_vars`](Self::env_vars).
    /// An absent or empty value is a [`OrchestrationError::MissingVariable`].
    pub fn path_var(&self, name: &str) -> Result<PathBuf> {
        self.env_vars()
            .remove(name)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!(OrchestrationError::MissingVariable { name: name.into() }))
    }

    /// Returns the managed repositories matching `predicate`, in configuration order.
    pub fn repositories<P>(&self, predicate: P) -> Vec<&Repository>
    where
        P: Fn(&Repository) -> bool,
    {
        self.repositories.iter().filter(|repo| predicate(repo)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::parse_environment_config;

    fn sample() -> ZenDevEnvironment {
        let config = parse_environment_config(
            r#"
name = "dev"
root = "/envs/dev"
home = "/home/tester"
buildroot = "/scratch/build"

[[repositories]]
name = "control-center/serviced"
path = "golang/src/github.com/control-center/serviced"

[[repositories]]
name = "zenpacks/ZenPacks.zenoss.Example"
path = "/opt/packs/example"
products = ["resmgr"]

[env]
ZENHOME = "/opt/zenoss"
ZENDEV_FLAVOR = "nightly"
"#,
        )
        .unwrap();
        ZenDevEnvironment::from_config(&config).unwrap()
    }

    #[test]
    fn directories_default_below_root() {
        let env = sample();
        assert_eq!(env.src_root(), Path::new("/envs/dev/src"));
        assert_eq!(env.build_root(), Path::new("/scratch/build"));
        assert_eq!(env.zen_home(), Path::new("/opt/zenoss"));
        assert_eq!(env.var_zenoss(), Path::new("/envs/dev/var_zenoss"));
    }

    #[test]
    fn relative_repository_paths_resolve_against_srcroot() {
        let env = sample();
        let serviced = env.repositories(|r| r.name.ends_with("control-center/serviced"));
        assert_eq!(serviced.len(), 1);
        assert_eq!(
            serviced[0].path,
            Path::new("/envs/dev/src/golang/src/github.com/control-center/serviced")
        );
    }

    #[test]
    fn env_table_overrides_derived_variables() {
        let env = sample();
        let vars = env.env_vars();
        assert_eq!(vars[ZENHOME], "/opt/zenoss");
        assert_eq!(vars[SRCROOT], "/envs/dev/src");
        assert_eq!(vars["ZENDEV_FLAVOR"], "nightly");
        assert_eq!(env.path_var(HOME).unwrap(), Path::new("/home/tester"));
    }

    #[test]
    fn path_overrides_are_expanded_and_resolved_against_root() {
        let config = parse_environment_config(
            r#"
name = "dev"
root = "/envs/dev"
home = "people/tester"
var_zenoss = "/ignored"

[[repositories]]
name = "zenoss-prodbin"
path = "prodbin"

[env]
SRCROOT = "checkout"
VAR_ZENOSS = "state"
"#,
        )
        .unwrap();
        let env = ZenDevEnvironment::from_config(&config).unwrap();

        assert_eq!(env.src_root(), Path::new("/envs/dev/checkout"));
        assert_eq!(env.var_zenoss(), Path::new("/envs/dev/state"));
        assert_eq!(env.home(), Path::new("/envs/dev/people/tester"));
        assert_eq!(
            env.repositories(|_| true)[0].path,
            Path::new("/envs/dev/checkout/prodbin")
        );

        let vars = env.env_vars();
        assert_eq!(vars[SRCROOT], "/envs/dev/checkout");
        assert_eq!(vars[VAR_ZENOSS], "/envs/dev/state");
        assert_eq!(vars[HOME], "/envs/dev/people/tester");
    }

    #[test]
    fn package_ids_come_from_zenpack_repositories() {
        let env = sample();
        let ids: Vec<_> = env
            .repositories(|_| true)
            .into_iter()
            .filter_map(Repository::package_id)
            .collect();
        assert_eq!(ids, ["ZenPacks.zenoss.Example"]);
    }

    #[test]
    fn unknown_variable_is_missing() {
        let err = sample().path_var("NOPE").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OrchestrationError>(),
            Some(OrchestrationError::MissingVariable { .. })
        ));
    }
}
