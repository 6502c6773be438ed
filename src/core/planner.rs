//! # Test Execution Planner Module / 测试执行计划模块
//!
//! This module turns the requested flags into the ordered list of targets
//! the orchestrator runs.
//!
//! 此模块将请求的标志转换为编排器运行的有序目标列表。

use crate::core::models::{Product, Target, TargetSelection};

/// The targets to run, in execution order.
/// 要运行的目标，按执行顺序排列。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub targets: Vec<Target>,
    /// Product variants that were requested but lost to a higher priority one.
    /// 被请求但因更高优先级的变体而未运行的产品变体。
    pub ignored_products: Vec<Product>,
}

impl ExecutionPlan {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Product variants paired with their flags, highest priority first.
/// Only the first set flag runs.
pub fn product_priority(selection: &TargetSelection) -> [(bool, Product); 6] {
    [
        (selection.devimg, Product::Devimg),
        (selection.resmgr, Product::Resmgr),
        (selection.ucspm, Product::Ucspm),
        (selection.nfvimon, Product::Nfvimon),
        (selection.core, Product::Core),
        (selection.zenpack_restore, Product::ZenpackRestore),
    ]
}

/// Creates the execution plan for a selection.
///
/// Order: at most one product variant, then ZEP (unit and/or integration),
/// then serviced unit, then serviced smoke.
///
/// 为选择创建执行计划。
/// 顺序：至多一个产品变体，然后是 ZEP（单元和/或集成），然后是 serviced 单元测试，最后是 serviced 冒烟测试。
pub fn plan_execution(selection: &TargetSelection) -> ExecutionPlan {
    let mut plan = ExecutionPlan::default();

    let mut requested = product_priority(selection)
        .into_iter()
        .filter(|(set, _)| *set)
        .map(|(_, product)| product);
    if let Some(product) = requested.next() {
        plan.targets.push(Target::Product(product));
    }
    plan.ignored_products.extend(requested);

    if selection.zep_unit || selection.zep_integration {
        plan.targets.push(Target::Zep);
    }
    if selection.serviced_unit {
        plan.targets.push(Target::ServicedUnit);
    }
    if selection.serviced_smoke {
        plan.targets.push(Target::ServicedSmoke);
    }

    plan
}
