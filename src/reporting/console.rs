//! # Console Reporting Module / 控制台报告模块
//!
//! This module handles the display of results in the console: a per-target
//! summary table after a test run and an overview of the environment.
//!
//! 此模块处理控制台中结果的显示：测试运行后的逐目标摘要表和环境概览。

use colored::*;

use crate::core::environment::ZenDevEnvironment;
use crate::core::models::TargetOutcome;
use crate::infra::t;

/// Formats one row of the summary table (without colour).
///
/// 格式化摘要表中的一行（不带颜色）。
pub fn summary_row(outcome: &TargetOutcome) -> String {
    let status = if outcome.is_failure() {
        t!("report.status_failed")
    } else {
        t!("report.status_passed")
    };
    format!(
        "{:<8} | {:<24} | {:>10} | {}",
        status,
        outcome.target.to_string(),
        format!("{:.2?}", outcome.duration),
        outcome.code
    )
}

/// Prints a formatted summary of the executed targets.
///
/// # Output Format / 输出格式
/// ```text
/// --- Test Summary ---
///   - Passed   | zenoss (core)            |     61.02s | 0
///   - Failed   | serviced (smoke)         |     12.40s | 2
/// ```
pub fn print_summary(outcomes: &[TargetOutcome]) {
    println!("\n{}", t!("report.summary_banner").bold());
    for outcome in outcomes {
        let row = summary_row(outcome);
        let row = if outcome.is_failure() {
            row.red()
        } else {
            row.green()
        };
        println!("  - {row}");
    }
}

/// Prints the environment name, its directories and managed repositories.
pub fn print_environment(env: &ZenDevEnvironment) {
    println!("{}", t!("env.name", name = env.name().yellow()));
    println!("  SRCROOT    {}", env.src_root().display());
    println!("  BUILDROOT  {}", env.build_root().display());
    println!("  ZENHOME    {}", env.zen_home().display());
    println!("  VAR_ZENOSS {}", env.var_zenoss().display());
    println!("  HOME       {}", env.home().display());

    let repositories = env.repositories(|_| true);
    println!("{}", t!("env.repositories", count = repositories.len()).cyan());
    for repo in repositories {
        match repo.package_id() {
            Some(package) => println!("  - {} ({}) [{}]", repo.name, repo.path.display(), package),
            None => println!("  - {} ({})", repo.name, repo.path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Product, Target};
    use std::time::Duration;

    #[test]
    fn summary_row_shows_target_and_code() {
        let row = summary_row(&TargetOutcome {
            target: Target::Product(Product::Resmgr),
            code: 3,
            duration: Duration::from_millis(1500),
        });
        assert!(row.contains("zenoss (resmgr)"));
        assert!(row.ends_with("| 3"));
        assert!(row.contains("1.50s"));
    }
}
