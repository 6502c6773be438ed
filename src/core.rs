//! # Core Module / 核心模块
//!
//! This module contains the test orchestration engine: the environment
//! context, image resolution and builds, mount and command assembly, the
//! per-family runners and the orchestrator that aggregates their results.
//!
//! 此模块包含测试编排引擎：环境上下文、镜像解析与构建、挂载与命令组装、
//! 各测试族的运行器以及汇总其结果的编排器。

pub mod config;
pub mod docker;
pub mod environment;
pub mod image;
pub mod models;
pub mod mounts;
pub mod orchestrator;
pub mod planner;
pub mod runners;

// Re-exports
pub use environment::ZenDevEnvironment;
pub use models::{OrchestrationError, TargetOutcome, TestOptions};
pub use orchestrator::run_tests;
