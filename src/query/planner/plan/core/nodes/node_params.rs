//! 节点参数
//!
//! 各算子族特有的规划期参数。表达式和子计划都以对象池句柄引用。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::query::planner::plan::core::explain::PlanNodeDescription;
use crate::utils::object_pool::{ExprRef, NodeRef, ObjectPool};

/// 边方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    Out,
    In,
    Both,
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeDirection::Out => write!(f, "OUT_EDGE"),
            EdgeDirection::In => write!(f, "IN_EDGE"),
            EdgeDirection::Both => write!(f, "BOTH"),
        }
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    Ascend,
    Descend,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Ascend => write!(f, "ASCEND"),
            OrderType::Descend => write!(f, "DESCEND"),
        }
    }
}

/// DataCollect 的收集方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectKind {
    Subgraph,
    RowBasedMove,
    MToN,
}

impl fmt::Display for CollectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectKind::Subgraph => write!(f, "SUBGRAPH"),
            CollectKind::RowBasedMove => write!(f, "ROW"),
            CollectKind::MToN => write!(f, "M TO N"),
        }
    }
}

/// 投影列
#[derive(Debug, Clone, PartialEq)]
pub struct YieldColumn {
    pub expr: ExprRef,
    pub alias: String,
}

impl YieldColumn {
    pub fn new(expr: ExprRef, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: alias.into(),
        }
    }
}

/// 遍历与读取类节点的参数
#[derive(Debug, Clone, PartialEq)]
pub struct ExploreParams {
    pub space: String,
    /// 起点表达式
    pub src: Option<ExprRef>,
    /// 标签或边类型名
    pub schemas: Vec<String>,
    pub direction: EdgeDirection,
    pub dedup: bool,
    pub limit: Option<i64>,
    pub filter: Option<ExprRef>,
}

impl ExploreParams {
    pub fn new(space: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            src: None,
            schemas: Vec::new(),
            direction: EdgeDirection::Out,
            dedup: false,
            limit: None,
            filter: None,
        }
    }
}

/// 节点参数
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeParams {
    #[default]
    None,
    Explore(ExploreParams),
    IndexScan {
        index: String,
        filter: Option<ExprRef>,
    },
    Filter {
        condition: ExprRef,
    },
    Project {
        columns: Vec<YieldColumn>,
    },
    Sort {
        factors: Vec<(String, OrderType)>,
    },
    Limit {
        offset: i64,
        count: i64,
    },
    Aggregate {
        group_keys: Vec<ExprRef>,
        group_items: Vec<ExprRef>,
    },
    Loop {
        body: Option<NodeRef>,
        condition: ExprRef,
    },
    Select {
        if_branch: Option<NodeRef>,
        else_branch: Option<NodeRef>,
        condition: ExprRef,
    },
    DataCollect {
        collect_kind: CollectKind,
        input_vars: Vec<String>,
    },
    DataJoin {
        hash_keys: Vec<ExprRef>,
        probe_keys: Vec<ExprRef>,
    },
    SwitchSpace {
        space: String,
    },
    /// 管理类、写入类节点的通用键值属性
    Attributes(Vec<(String, String)>),
}

fn join_exprs(pool: &ObjectPool, exprs: &[ExprRef]) -> String {
    exprs
        .iter()
        .map(|e| pool.expr(*e).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn branch_id(pool: &ObjectPool, branch: &Option<NodeRef>) -> String {
    match branch {
        Some(node) => pool.node(*node).id().to_string(),
        None => "-".to_string(),
    }
}

impl NodeParams {
    /// 把参数写入节点描述
    pub fn describe(&self, pool: &ObjectPool, desc: &mut PlanNodeDescription) {
        match self {
            NodeParams::None => {}
            NodeParams::Explore(p) => {
                desc.add_description("space", p.space.clone());
                if let Some(src) = p.src {
                    desc.add_description("src", pool.expr(src).to_string());
                }
                desc.add_description("schemas", p.schemas.join(","));
                desc.add_description("direction", p.direction.to_string());
                desc.add_description("dedup", p.dedup.to_string());
                if let Some(limit) = p.limit {
                    desc.add_description("limit", limit.to_string());
                }
                if let Some(filter) = p.filter {
                    desc.add_description("filter", pool.expr(filter).to_string());
                }
            }
            NodeParams::IndexScan { index, filter } => {
                desc.add_description("index", index.clone());
                if let Some(filter) = filter {
                    desc.add_description("filter", pool.expr(*filter).to_string());
                }
            }
            NodeParams::Filter { condition } => {
                desc.add_description("condition", pool.expr(*condition).to_string());
            }
            NodeParams::Project { columns } => {
                let cols = columns
                    .iter()
                    .map(|c| format!("{} AS {}", pool.expr(c.expr), c.alias))
                    .collect::<Vec<_>>()
                    .join(",");
                desc.add_description("columns", cols);
            }
            NodeParams::Sort { factors } => {
                let factors = factors
                    .iter()
                    .map(|(col, order)| format!("{} {}", col, order))
                    .collect::<Vec<_>>()
                    .join(",");
                desc.add_description("factors", factors);
            }
            NodeParams::Limit { offset, count } => {
                desc.add_description("offset", offset.to_string());
                desc.add_description("count", count.to_string());
            }
            NodeParams::Aggregate {
                group_keys,
                group_items,
            } => {
                desc.add_description("groupKeys", join_exprs(pool, group_keys));
                desc.add_description("groupItems", join_exprs(pool, group_items));
            }
            NodeParams::Loop { body, condition } => {
                desc.add_description("condition", pool.expr(*condition).to_string());
                desc.add_description("loopBody", branch_id(pool, body));
            }
            NodeParams::Select {
                if_branch,
                else_branch,
                condition,
            } => {
                desc.add_description("condition", pool.expr(*condition).to_string());
                desc.add_description("thenBody", branch_id(pool, if_branch));
                desc.add_description("elseBody", branch_id(pool, else_branch));
            }
            NodeParams::DataCollect {
                collect_kind,
                input_vars,
            } => {
                desc.add_description("kind", collect_kind.to_string());
                desc.add_description("inputVars", input_vars.join(","));
            }
            NodeParams::DataJoin {
                hash_keys,
                probe_keys,
            } => {
                desc.add_description("hashKeys", join_exprs(pool, hash_keys));
                desc.add_description("probeKeys", join_exprs(pool, probe_keys));
            }
            NodeParams::SwitchSpace { space } => {
                desc.add_description("space", space.clone());
            }
            NodeParams::Attributes(attrs) => {
                for (k, v) in attrs {
                    desc.add_description(k.clone(), v.clone());
                }
            }
        }
    }

    /// 分支子计划：(子计划根, 是否为 do/then 分支)
    pub fn branches(&self) -> Vec<(NodeRef, bool)> {
        match self {
            NodeParams::Loop { body: Some(body), .. } => vec![(*body, true)],
            NodeParams::Select {
                if_branch,
                else_branch,
                ..
            } => {
                let mut branches = Vec::new();
                if let Some(b) = if_branch {
                    branches.push((*b, true));
                }
                if let Some(b) = else_branch {
                    branches.push((*b, false));
                }
                branches
            }
            _ => Vec::new(),
        }
    }

    /// 参数中引用的所有表达式
    pub fn exprs(&self) -> Vec<ExprRef> {
        match self {
            NodeParams::Explore(p) => p.src.into_iter().chain(p.filter).collect(),
            NodeParams::IndexScan { filter, .. } => filter.iter().copied().collect(),
            NodeParams::Filter { condition }
            | NodeParams::Loop { condition, .. }
            | NodeParams::Select { condition, .. } => vec![*condition],
            NodeParams::Project { columns } => columns.iter().map(|c| c.expr).collect(),
            NodeParams::Aggregate {
                group_keys,
                group_items,
            } => group_keys.iter().chain(group_items).copied().collect(),
            NodeParams::DataJoin {
                hash_keys,
                probe_keys,
            } => hash_keys.iter().chain(probe_keys).copied().collect(),
            _ => Vec::new(),
        }
    }
}
