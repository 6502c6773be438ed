//! # Reporting Module / 报告模块
//!
//! This module prints the end-of-run summary and the environment overview
//! to the console, in colour and with internationalization support.
//!
//! 此模块在控制台打印运行结束时的摘要和环境概览，支持颜色和国际化。

pub mod console;

// Re-export common reporting functions
pub use console::{print_environment, print_summary};
