//! 计划节点
//!
//! 所有种类共用 `PlanNode`，形状由 `PlanNodeKind::shape()` 决定，
//! 种类特有的参数放在 `NodeParams` 里。

pub mod factory;
pub mod node_params;
pub mod plan_node;
pub mod plan_node_kind;

pub use node_params::{CollectKind, EdgeDirection, ExploreParams, NodeParams, OrderType, YieldColumn};
pub use plan_node::PlanNode;
pub use plan_node_kind::{NodeShape, PlanNodeKind};
