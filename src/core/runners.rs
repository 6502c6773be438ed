//! # Target Runners / 目标运行器
//!
//! One runner per test family. Each returns the exit code of the process
//! that ran the tests; fatal conditions (missing image, missing repository,
//! conflicting mounts) are returned as errors instead.
//!
//! 每个测试族对应一个运行器。每个运行器返回运行测试的进程的退出码；
//! 致命条件（镜像缺失、仓库缺失、挂载冲突）则以错误形式返回。

use anyhow::Result;
use colored::*;

use crate::core::docker::{TEST_ENTRYPOINT, run_invocation};
use crate::core::environment::ZenDevEnvironment;
use crate::core::image::{
    GENERIC_TEST_IMAGE, MAKE, build_image, image_exists, packages_for, resolve_image,
};
use crate::core::models::{OrchestrationError, Product, TestOptions};
use crate::core::mounts::{MountKind, MountMap, compose};
use crate::infra::command::{Executor, Invocation};
use crate::infra::t;

/// Image family resolved for the devimg and ZEP runners.
pub const DEVIMG_PRODUCT: &str = "devimg";
/// Suffix identifying the serviced repository among the managed ones.
pub const SERVICED_REPOSITORY: &str = "control-center/serviced";

/// Runs the Zenoss unit tests for a product variant.
///
/// The devimg variant runs in the resolved development image and never
/// builds. Every other variant builds `zendev_test` first, unless
/// `use_existing` is set and that image is already present; a failed build
/// is returned without running a container.
///
/// 为产品变体运行 Zenoss 单元测试。
/// devimg 变体在解析出的开发镜像中运行，从不构建。其他变体都会先构建 `zendev_test`，
/// 除非设置了 `use_existing` 且该镜像已存在；构建失败时直接返回其退出码，不运行容器。
pub async fn run_product_tests<E: Executor>(
    executor: &E,
    env: &ZenDevEnvironment,
    options: &TestOptions,
    product: Product,
) -> Result<i32> {
    let (image, mounts) = if product.uses_prebuilt_image() {
        let image = resolve_image(executor, env, DEVIMG_PRODUCT).await?;
        (image, compose(env, MountKind::ProductImage)?)
    } else {
        let reuse = options.use_existing && image_exists(executor, GENERIC_TEST_IMAGE).await?;
        if reuse {
            println!("{}", t!("runner.reusing_image", image = GENERIC_TEST_IMAGE).cyan());
        } else {
            let packages = packages_for(env, product.name());
            let code = build_image(executor, env, GENERIC_TEST_IMAGE, &packages).await?;
            if code != 0 {
                return Ok(code);
            }
        }
        (GENERIC_TEST_IMAGE.to_string(), compose(env, MountKind::Generic)?)
    };

    let mut subcommand = vec![TEST_ENTRYPOINT.to_string()];
    if options.selection.zenpack_restore {
        subcommand.push("zenpack".into());
    }
    run_container(executor, &image, &mounts, options, &subcommand).await
}

/// Runs the ZEP unit and/or integration tests in the development image.
///
/// 在开发镜像中运行 ZEP 单元和/或集成测试。
pub async fn run_zep_tests<E: Executor>(
    executor: &E,
    env: &ZenDevEnvironment,
    options: &TestOptions,
) -> Result<i32> {
    let image = resolve_image(executor, env, DEVIMG_PRODUCT).await?;
    let mounts = compose(env, MountKind::MessageSubsystem)?;

    let mut subcommand = vec![TEST_ENTRYPOINT.to_string(), "zep".to_string()];
    if options.selection.zep_integration {
        subcommand.push("integration".into());
    }
    if options.selection.zep_unit {
        subcommand.push("unit".into());
    }
    run_container(executor, &image, &mounts, options, &subcommand).await
}

/// Runs `make test` (or `make smoketest`) directly in the serviced checkout.
/// No container is involved.
///
/// 直接在 serviced 检出目录中运行 `make test`（或 `make smoketest`），不涉及容器。
pub async fn run_serviced_tests<E: Executor>(
    executor: &E,
    env: &ZenDevEnvironment,
    options: &TestOptions,
    smoke: bool,
) -> Result<i32> {
    let repo = env
        .repositories(|repo| repo.name.ends_with(SERVICED_REPOSITORY))
        .into_iter()
        .next()
        .ok_or_else(|| OrchestrationError::RepositoryNotFound {
            suffix: SERVICED_REPOSITORY.to_string(),
        })?;

    let target = if smoke { "smoketest" } else { "test" };
    let invocation = Invocation::new(MAKE)
        .arg(target)
        .args(options.forwarded_args().iter().cloned())
        .working_dir(&repo.path)
        .envs(env.env_vars());

    println!(
        "{}",
        t!("runner.calling", tool = MAKE, command = invocation.command_line())
    );
    executor.status(&invocation).await
}

async fn run_container<E: Executor>(
    executor: &E,
    image: &str,
    mounts: &MountMap,
    options: &TestOptions,
    subcommand: &[String],
) -> Result<i32> {
    let invocation = run_invocation(
        image,
        mounts,
        options.interactive,
        !options.no_tty,
        &options.arguments,
        subcommand,
    );

    println!("{}", t!("runner.using_image", image = image));
    println!(
        "{}",
        t!("runner.calling", tool = "Docker", command = invocation.command_line())
    );
    executor.status(&invocation).await
}
