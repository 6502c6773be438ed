//! # Zendev Library / Zendev 库
//!
//! This library provides the test orchestration engine behind `zendev test`.
//! It decides which container image runs each requested test family, builds
//! the image on demand, mounts the environment into the container and folds
//! the exit codes of every family into a single pass/fail decision.
//!
//! 此库提供 `zendev test` 背后的测试编排引擎。
//! 它决定每个测试族使用哪个容器镜像，按需构建镜像，将环境挂载到容器中，
//! 并将各测试族的退出码汇总为单一的通过/失败结论。
//!
//! ## Modules / 模块
//!
//! - `core` - Environment, image resolution, mounts, runners and the orchestrator
//! - `infra` - Process invocation and file system helpers
//! - `reporting` - Console output and the final summary
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 环境、镜像解析、挂载、运行器和编排器
//! - `infra` - 进程调用和文件系统辅助功能
//! - `reporting` - 控制台输出和最终摘要
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::environment::ZenDevEnvironment;
pub use crate::core::models;
pub use crate::core::orchestrator;

/// Initializes the application's internationalization (i18n).
///
/// An explicit `language` wins. Otherwise the system locale is used: the full
/// locale (e.g. "zh-CN") is tried first, then only the language code (e.g.
/// "en"), and finally the default language ("en").
pub fn init(language: Option<&str>) {
    let locale = language
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale.as_str()) {
        locale.as_str()
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
