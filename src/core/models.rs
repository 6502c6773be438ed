//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures shared by the orchestrator and
//! the runners: the requested targets, the options that shape a run, the
//! outcome of each target and the fatal error conditions.
//!
//! 此模块定义编排器和运行器共享的数据结构：请求的目标、影响运行的选项、
//! 每个目标的结果以及致命错误条件。

use crate::infra::t;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One boolean per selectable test family.
/// 每个可选测试族对应一个布尔值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetSelection {
    /// Run the unit tests in the existing devimg.
    pub devimg: bool,
    pub resmgr: bool,
    pub ucspm: bool,
    pub nfvimon: bool,
    pub core: bool,
    /// Build a core image and run the zenpack restore tests.
    pub zenpack_restore: bool,
    pub zep_unit: bool,
    pub zep_integration: bool,
    pub serviced_unit: bool,
    pub serviced_smoke: bool,
}

/// Everything a single `zendev test` invocation was asked to do.
///
/// 一次 `zendev test` 调用被要求执行的全部内容。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestOptions {
    pub selection: TargetSelection,
    /// Reuse an existing `zendev_test` image instead of rebuilding it.
    /// 复用已有的 `zendev_test` 镜像而不是重新构建。
    pub use_existing: bool,
    /// Start a shell in the container instead of running the tests.
    /// 在容器中启动 shell 而不是运行测试。
    pub interactive: bool,
    pub no_tty: bool,
    /// Trailing arguments. The first entry is the invoking command's own name
    /// and is never forwarded.
    /// 尾随参数。第一项是调用命令自身的名称，永远不会被转发。
    pub arguments: Vec<String>,
}

impl TestOptions {
    /// The trailing arguments handed to the test entry point.
    pub fn forwarded_args(&self) -> &[String] {
        self.arguments.get(1..).unwrap_or_default()
    }
}

/// The product variants of the image test family, in priority order.
/// 镜像测试族的产品变体，按优先级排序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    /// The already built development image, resolved but never built.
    Devimg,
    Resmgr,
    Ucspm,
    Nfvimon,
    Core,
    ZenpackRestore,
}

impl Product {
    /// Name used for image repositories and the package scan.
    pub fn name(&self) -> &'static str {
        match self {
            Product::Devimg => "devimg",
            Product::Resmgr => "resmgr",
            Product::Ucspm => "ucspm",
            Product::Nfvimon => "nfvimon",
            // Both core variants build the same image.
            Product::Core | Product::ZenpackRestore => "core",
        }
    }

    /// Whether the variant runs in a prebuilt, resolved image.
    pub fn uses_prebuilt_image(&self) -> bool {
        matches!(self, Product::Devimg)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Product::ZenpackRestore => f.write_str("zenpack-restore"),
            other => f.write_str(other.name()),
        }
    }
}

/// A unit of work scheduled by the orchestrator.
/// 编排器调度的工作单元。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Product(Product),
    /// ZEP unit and/or integration tests.
    Zep,
    ServicedUnit,
    ServicedSmoke,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Product(product) => write!(f, "zenoss ({product})"),
            Target::Zep => f.write_str("zep"),
            Target::ServicedUnit => f.write_str("serviced (unit)"),
            Target::ServicedSmoke => f.write_str("serviced (smoke)"),
        }
    }
}

/// The result code of one executed target. Targets that were not requested
/// never produce an outcome.
///
/// 一个已执行目标的结果码。未被请求的目标永远不会产生结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub target: Target,
    /// Process exit code; `0` means success.
    pub code: i32,
    pub duration: Duration,
}

impl TargetOutcome {
    pub fn is_failure(&self) -> bool {
        self.code != 0
    }
}

/// Fatal conditions that stop the whole invocation.
///
/// These travel inside `anyhow::Error`; use `downcast_ref` to inspect them.
///
/// 使整个调用停止的致命条件。
/// 它们包装在 `anyhow::Error` 中传递；使用 `downcast_ref` 检查。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestrationError {
    /// No target flag was set.
    NoTestsSpecified,
    /// At least one requested target returned a non-zero code.
    SomeTestsFailed { failed: Vec<String> },
    /// Neither the environment-tagged nor the `latest` image exists locally.
    ImageNotFound { product: String, tried: Vec<String> },
    /// No managed repository matched the expected name.
    RepositoryNotFound { suffix: String },
    /// Two mounts claim the same host path with different container paths.
    MountConflict {
        host: PathBuf,
        existing: String,
        requested: String,
    },
    /// A required variable is absent from the environment context.
    MissingVariable { name: String },
}

impl fmt::Display for OrchestrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrchestrationError::NoTestsSpecified => write!(f, "{}", t!("error.no_tests")),
            OrchestrationError::SomeTestsFailed { failed } => {
                write!(f, "{}", t!("error.tests_failed", targets = failed.join(", ")))
            }
            OrchestrationError::ImageNotFound { product, tried } => write!(
                f,
                "{}",
                t!("error.image_not_found", product = product, tried = tried.join(", "))
            ),
            OrchestrationError::RepositoryNotFound { suffix } => {
                write!(f, "{}", t!("error.repository_not_found", suffix = suffix))
            }
            OrchestrationError::MountConflict {
                host,
                existing,
                requested,
            } => write!(
                f,
                "{}",
                t!(
                    "error.mount_conflict",
                    host = host.display(),
                    existing = existing,
                    requested = requested
                )
            ),
            OrchestrationError::MissingVariable { name } => {
                write!(f, "{}", t!("error.missing_variable", name = name))
            }
        }
    }
}

impl std::error::Error for OrchestrationError {}
