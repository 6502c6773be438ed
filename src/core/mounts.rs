//! # Mount Composer / 挂载组合器
//!
//! Decides which host directories are bound into the test container, and
//! where, for each kind of target.
//!
//! 为每种目标决定将哪些宿主机目录绑定到测试容器中的什么位置。

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::environment::{HOME, SRCROOT, ZENHOME, ZenDevEnvironment};
use crate::core::models::OrchestrationError;

pub const CONTAINER_SRC: &str = "/mnt/src";
pub const CONTAINER_BUILD: &str = "/mnt/build";
pub const CONTAINER_MAVEN_CACHE: &str = "/home/zenoss/.m2";
pub const CONTAINER_VAR_ZENOSS: &str = "/var/zenoss";
pub const CONTAINER_ZENHOME: &str = "/opt/zenoss";

/// Which family of container the mounts are for.
/// 挂载所服务的容器族。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountKind {
    /// Tests in the freshly built `zendev_test` image.
    Generic,
    /// Tests in a prebuilt product image; also needs the installed product.
    ProductImage,
    /// ZEP tests.
    MessageSubsystem,
}

/// Host path to container path bindings.
///
/// Iteration is ordered by host path, so the generated command line is
/// stable. A host path can be bound to only one container path.
///
/// 宿主机路径到容器路径的绑定。
/// 按宿主机路径有序迭代，因此生成的命令行是稳定的。一个宿主机路径只能绑定到一个容器路径。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountMap {
    entries: BTreeMap<PathBuf, String>,
}

impl MountMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding. Re-adding an identical binding is a no-op; binding an
    /// already mounted host path somewhere else is a
    /// [`OrchestrationError::MountConflict`].
    pub fn insert(&mut self, host: impl Into<PathBuf>, container: impl Into<String>) -> Result<()> {
        let host = host.into();
        let container = container.into();
        match self.entries.get(&host) {
            Some(existing) if *existing == container => Ok(()),
            Some(existing) => Err(OrchestrationError::MountConflict {
                host,
                existing: existing.clone(),
                requested: container,
            }
            .into()),
            None => {
                self.entries.insert(host, container);
                Ok(())
            }
        }
    }

    pub fn get(&self, host: &Path) -> Option<&str> {
        self.entries.get(host).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.entries
            .iter()
            .map(|(host, container)| (host.as_path(), container.as_str()))
    }

    /// `host:container` volume specifications, in iteration order.
    pub fn volume_specs(&self) -> Vec<String> {
        self.iter()
            .map(|(host, container)| format!("{}:{}", host.display(), container))
            .collect()
    }
}

/// Builds the mounts for `kind`. The environment is only read, and every call
/// returns a new map.
///
/// | kind               | mounts                                                          |
/// |--------------------|-----------------------------------------------------------------|
/// | `Generic`          | SRCROOT, build root, HOME as maven cache, var_zenoss            |
/// | `ProductImage`     | `Generic` plus ZENHOME                                          |
/// | `MessageSubsystem` | SRCROOT, build root, HOME/.m2 as maven cache, ZENHOME           |
///
/// 为 `kind` 构建挂载。环境只会被读取，每次调用都返回新的映射。
pub fn compose(env: &ZenDevEnvironment, kind: MountKind) -> Result<MountMap> {
    let mut mounts = MountMap::new();
    mounts.insert(env.path_var(SRCROOT)?, CONTAINER_SRC)?;
    mounts.insert(env.build_root(), CONTAINER_BUILD)?;

    match kind {
        MountKind::Generic | MountKind::ProductImage => {
            mounts.insert(env.path_var(HOME)?, CONTAINER_MAVEN_CACHE)?;
            mounts.insert(env.var_zenoss(), CONTAINER_VAR_ZENOSS)?;
            if kind == MountKind::ProductImage {
                mounts.insert(env.path_var(ZENHOME)?, CONTAINER_ZENHOME)?;
            }
        }
        MountKind::MessageSubsystem => {
            mounts.insert(env.path_var(HOME)?.join(".m2"), CONTAINER_MAVEN_CACHE)?;
            mounts.insert(env.path_var(ZENHOME)?, CONTAINER_ZENHOME)?;
        }
    }

    Ok(mounts)
}
