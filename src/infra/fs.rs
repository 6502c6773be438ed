//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the scoped working-directory guard used around the
//! build tool and direct test invocations, plus path expansion for values
//! read from configuration.
//!
//! 此模块提供在构建工具和直接测试调用周围使用的作用域工作目录守卫，
//! 以及对配置中读取的路径进行展开的功能。

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

use crate::infra::t;

/// Changes the current directory for as long as the guard lives.
///
/// The previous directory is restored when the guard is dropped, which
/// happens on every exit path: normal return, `?` propagation and unwinding.
/// The current directory is process-wide, so only one guard should be active
/// at a time.
///
/// 在守卫存活期间更改当前目录。
/// 守卫被丢弃时恢复之前的目录，这发生在每一条退出路径上：正常返回、`?` 传播和栈展开。
/// 当前目录是进程级的，因此同一时间只应有一个守卫处于活动状态。
#[derive(Debug)]
pub struct ScopedDir {
    previous: PathBuf,
}

impl ScopedDir {
    pub fn enter(dir: &Path) -> Result<Self> {
        let previous = env::current_dir().with_context(|| t!("fs.cwd_unavailable"))?;
        env::set_current_dir(dir)
            .with_context(|| t!("fs.chdir_failed", path = dir.display()))?;
        Ok(Self { previous })
    }

    /// The directory that will be restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for ScopedDir {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            eprintln!(
                "{}",
                t!("fs.restore_failed", path = self.previous.display(), error = e)
            );
        }
    }
}

/// Expands `~` and environment variables in a configured path.
///
/// # Arguments
/// * `raw` - The path as written in the configuration file
///
/// # Returns
/// The expanded path, or an error naming the undefined variable
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .with_context(|| t!("fs.expand_failed", path = raw))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Resolves `path` against `base` unless it is already absolute.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
