pub mod explain;
pub mod nodes;

pub use explain::{Pair, PlanDescription, PlanNodeBranchInfo, PlanNodeDescription, ProfilingStats};
pub use nodes::{
    CollectKind, EdgeDirection, ExploreParams, NodeParams, NodeShape, OrderType, PlanNode,
    PlanNodeKind, YieldColumn,
};
