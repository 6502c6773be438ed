//! # Env Command Module / Env 命令模块
//!
//! Prints the environment the `test` command would use.
//!
//! 打印 `test` 命令将使用的环境。

use anyhow::Result;

use crate::core::environment::ZenDevEnvironment;
use crate::infra::fs::expand_path;
use crate::reporting::print_environment;

pub fn execute(config: &str) -> Result<()> {
    let env = ZenDevEnvironment::load(&expand_path(config)?)?;
    print_environment(&env);
    Ok(())
}
