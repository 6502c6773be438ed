//! # Test Orchestrator / 测试编排器
//!
//! Runs every requested target, one after another, and turns their exit
//! codes into a single verdict. A failing target does not stop the targets
//! scheduled after it, but any failure fails the invocation.
//!
//! 逐个运行每个请求的目标，并将它们的退出码转换为单一结论。
//! 失败的目标不会阻止其后已调度的目标，但任何失败都会导致整个调用失败。

use anyhow::Result;
use colored::*;
use std::time::Instant;

use crate::core::environment::ZenDevEnvironment;
use crate::core::models::{OrchestrationError, Target, TargetOutcome, TestOptions};
use crate::core::planner::{ExecutionPlan, plan_execution};
use crate::core::runners::{run_product_tests, run_serviced_tests, run_zep_tests};
use crate::infra::command::Executor;
use crate::infra::t;
use crate::reporting::console::print_summary;

/// The main entry point for `zendev test`.
///
/// # Returns
/// The outcome of every executed target when all of them passed. Otherwise
/// an error: [`OrchestrationError::NoTestsSpecified`] when nothing was
/// selected (no process is started), [`OrchestrationError::SomeTestsFailed`]
/// when a target returned non-zero, or the fatal error a runner raised.
///
/// `zendev test` 的主入口。
/// 所有目标都通过时返回每个已执行目标的结果；否则返回错误：未选择任何目标时为
/// [`OrchestrationError::NoTestsSpecified`]（不会启动任何进程），有目标返回非零时为
/// [`OrchestrationError::SomeTestsFailed`]，或运行器抛出的致命错误。
pub async fn run_tests<E: Executor>(
    executor: &E,
    env: &ZenDevEnvironment,
    options: &TestOptions,
) -> Result<Vec<TargetOutcome>> {
    let plan = plan_execution(&options.selection);
    if plan.is_empty() {
        return Err(OrchestrationError::NoTestsSpecified.into());
    }

    let outcomes = execute_plan(executor, env, options, &plan).await?;
    print_summary(&outcomes);
    evaluate(outcomes)
}

/// Runs the planned targets in order and collects their outcomes.
/// Fatal runner errors stop the remaining targets.
pub async fn execute_plan<E: Executor>(
    executor: &E,
    env: &ZenDevEnvironment,
    options: &TestOptions,
    plan: &ExecutionPlan,
) -> Result<Vec<TargetOutcome>> {
    if !plan.ignored_products.is_empty() {
        let ignored: Vec<String> = plan.ignored_products.iter().map(ToString::to_string).collect();
        println!(
            "{}",
            t!("orchestrator.ignored_products", products = ignored.join(", ")).yellow()
        );
    }

    let mut outcomes = Vec::with_capacity(plan.targets.len());
    for &target in &plan.targets {
        println!("\n{}", t!("orchestrator.running_target", target = target).bold());
        let start_time = Instant::now();
        let code = run_target(executor, env, options, target).await?;
        let duration = start_time.elapsed();

        if code == 0 {
            println!(
                "{}",
                t!("orchestrator.target_passed", target = target, duration = format!("{duration:.2?}"))
                    .green()
            );
        } else {
            println!(
                "{}",
                t!(
                    "orchestrator.target_failed",
                    target = target,
                    code = code,
                    duration = format!("{duration:.2?}")
                )
                .red()
            );
        }
        outcomes.push(TargetOutcome {
            target,
            code,
            duration,
        });
    }
    Ok(outcomes)
}

/// Dispatches a target to its runner.
pub async fn run_target<E: Executor>(
    executor: &E,
    env: &ZenDevEnvironment,
    options: &TestOptions,
    target: Target,
) -> Result<i32> {
    match target {
        Target::Product(product) => run_product_tests(executor, env, options, product).await,
        Target::Zep => run_zep_tests(executor, env, options).await,
        Target::ServicedUnit => run_serviced_tests(executor, env, options, false).await,
        Target::ServicedSmoke => run_serviced_tests(executor, env, options, true).await,
    }
}

/// Folds the outcomes into the overall verdict.
///
/// This is also usable on its own, for outcomes gathered outside
/// [`run_tests`], so an empty list is rejected here as well.
///
/// 将结果汇总为总体结论。也可单独用于在 [`run_tests`] 之外收集的结果，因此这里同样拒绝空列表。
pub fn evaluate(outcomes: Vec<TargetOutcome>) -> Result<Vec<TargetOutcome>> {
    if outcomes.is_empty() {
        return Err(OrchestrationError::NoTestsSpecified.into());
    }
    let failed: Vec<String> = outcomes
        .iter()
        .filter(|outcome| outcome.is_failure())
        .map(|outcome| outcome.target.to_string())
        .collect();
    if !failed.is_empty() {
        return Err(OrchestrationError::SomeTestsFailed { failed }.into());
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Product;
    use std::time::Duration;

    fn outcome(target: Target, code: i32) -> TargetOutcome {
        TargetOutcome {
            target,
            code,
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn evaluate_passes_when_every_code_is_zero() {
        let outcomes = vec![outcome(Target::Zep, 0), outcome(Target::ServicedUnit, 0)];
        assert_eq!(evaluate(outcomes).unwrap().len(), 2);
    }

    #[test]
    fn evaluate_fails_on_any_non_zero_code() {
        let outcomes = vec![
            outcome(Target::Product(Product::Core), 0),
            outcome(Target::ServicedSmoke, 2),
            outcome(Target::Zep, -1),
        ];
        let err = evaluate(outcomes).unwrap_err();
        assert_eq!(
            err.downcast_ref::<OrchestrationError>(),
            Some(&OrchestrationError::SomeTestsFailed {
                failed: vec!["serviced (smoke)".into(), "zep".into()],
            })
        );
    }

    #[test]
    fn evaluate_rejects_an_empty_run() {
        let err = evaluate(Vec::new()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<OrchestrationError>(),
            Some(&OrchestrationError::NoTestsSpecified)
        );
    }
}
