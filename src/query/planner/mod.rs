//! 规划器
//!
//! 计划图的表示：节点、执行计划以及 EXPLAIN 描述

pub mod plan;

pub use plan::{ExecutionPlan, PlanNode, PlanNodeKind};
