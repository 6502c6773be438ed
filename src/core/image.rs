//! # Image Resolution and Builds / 镜像解析与构建
//!
//! This module answers two questions for a runner: which already built image
//! should the tests run in, and how to build the generic test image when it is
//! missing or a rebuild is required.
//!
//! 此模块为运行器回答两个问题：测试应在哪个已构建的镜像中运行，
//! 以及当通用测试镜像缺失或需要重建时如何构建它。

use anyhow::{Context, Result, bail};
use colored::*;
use std::collections::{BTreeMap, BTreeSet};

use crate::core::docker::images_query;
use crate::core::environment::{Repository, ZenDevEnvironment};
use crate::core::models::OrchestrationError;
use crate::infra::command::{Executor, Invocation};
use crate::infra::t;

/// Image built and run by the generic runner.
pub const GENERIC_TEST_IMAGE: &str = "zendev_test";
/// Tag tried after the environment's own tag.
pub const FALLBACK_TAG: &str = "latest";
/// Build tool executable.
pub const MAKE: &str = "make";
/// Build tool target producing a test image.
pub const BUILD_TARGET: &str = "devimg";

/// `zendev/<product>:<tag>`
pub fn image_reference(product: &str, tag: &str) -> String {
    format!("zendev/{product}:{tag}")
}

/// Checks the container runtime's local image index for an exact reference.
/// A non-empty answer means the image exists.
///
/// 在容器运行时的本地镜像索引中查找精确引用。非空结果表示镜像存在。
pub async fn image_exists<E: Executor>(executor: &E, reference: &str) -> Result<bool> {
    let query = images_query(reference);
    let output = executor
        .output(&query)
        .await
        .with_context(|| t!("image.query_failed", image = reference))?;
    if !output.success() {
        bail!(
            "{}\n{}",
            t!("image.query_failed", image = reference),
            output.stderr.trim()
        );
    }
    Ok(!output.stdout.trim().is_empty())
}

/// Picks the image for `product`: the one tagged with the environment name
/// when present, otherwise `latest`.
///
/// # Returns
/// The image reference, or [`OrchestrationError::ImageNotFound`] when neither
/// exists. That error is fatal for the whole invocation.
///
/// 为 `product` 选择镜像：优先使用以环境名称为标签的镜像，否则使用 `latest`。
/// 两者都不存在时返回 [`OrchestrationError::ImageNotFound`]，这对整个调用是致命的。
pub async fn resolve_image<E: Executor>(
    executor: &E,
    env: &ZenDevEnvironment,
    product: &str,
) -> Result<String> {
    let mut tried = Vec::new();
    for tag in [env.name(), FALLBACK_TAG] {
        let reference = image_reference(product, tag);
        if image_exists(executor, &reference).await? {
            return Ok(reference);
        }
        tried.push(reference);
    }
    Err(OrchestrationError::ImageNotFound {
        product: product.to_string(),
        tried,
    }
    .into())
}

/// Package identifiers of the managed repositories that belong to `product`,
/// sorted and without duplicates.
///
/// 属于 `product` 的受管仓库的包标识符，已排序且无重复。
pub fn packages_for(env: &ZenDevEnvironment, product: &str) -> Vec<String> {
    env.repositories(|repo| repo.belongs_to(product))
        .into_iter()
        .filter_map(Repository::package_id)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Variables handed to the build tool on top of the environment's own.
pub fn build_overlay(
    env: &ZenDevEnvironment,
    image: &str,
    packages: &[String],
) -> BTreeMap<String, String> {
    let mut overlay = env.env_vars();
    overlay.insert("DEVIMG_SYMLINK".into(), String::new());
    overlay.insert("devimg_MOUNTS".into(), String::new());
    overlay.insert("devimg_TAGNAME".into(), image.to_string());
    overlay.insert("devimg_CONTAINER".into(), image.to_string());
    overlay.insert("ZENPACKS".into(), packages.join(" "));
    overlay
}

/// `make devimg`, run in the build root with the build overlay.
pub fn build_invocation(env: &ZenDevEnvironment, image: &str, packages: &[String]) -> Invocation {
    Invocation::new(MAKE)
        .arg(BUILD_TARGET)
        .working_dir(env.build_root())
        .envs(build_overlay(env, image, packages))
}

/// Builds `image` with the given packages and returns the build tool's exit code.
///
/// 使用给定的包构建 `image` 并返回构建工具的退出码。
pub async fn build_image<E: Executor>(
    executor: &E,
    env: &ZenDevEnvironment,
    image: &str,
    packages: &[String],
) -> Result<i32> {
    println!(
        "{}",
        t!("image.building", image = image, count = packages.len()).blue()
    );
    let invocation = build_invocation(env, image, packages);
    let code = executor.status(&invocation).await?;
    if code != 0 {
        println!("{}", t!("image.build_failed", image = image, code = code).red());
    }
    Ok(code)
}
