//! 计划节点种类与形状
//!
//! `PlanNodeKind` 是封闭的算子族枚举，`shape()` 把每个种类映射到它的
//! 依赖形状（依赖数量和具名输入变量槽位）。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeShape {
    /// 没有依赖，只有 Start
    Leaf,
    /// 一个结构依赖，没有具名输入（管理类节点）
    SingleDependency,
    /// 一个结构依赖加一个具名输入变量
    SingleInput,
    /// 两个结构依赖加左右两个具名输入变量
    BiInput,
}

impl NodeShape {
    /// 结构依赖数量
    pub const fn arity(self) -> usize {
        match self {
            NodeShape::Leaf => 0,
            NodeShape::SingleDependency | NodeShape::SingleInput => 1,
            NodeShape::BiInput => 2,
        }
    }

    /// 具名输入变量槽位数量
    pub const fn input_var_slots(self) -> usize {
        match self {
            NodeShape::Leaf | NodeShape::SingleDependency => 0,
            NodeShape::SingleInput => 1,
            NodeShape::BiInput => 2,
        }
    }
}

macro_rules! plan_node_kinds {
    ($($kind:ident => $shape:ident),* $(,)?) => {
        /// 计划节点种类
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum PlanNodeKind {
            $($kind,)*
        }

        impl PlanNodeKind {
            /// 所有种类
            pub const ALL: &'static [PlanNodeKind] = &[$(PlanNodeKind::$kind,)*];

            /// 稳定的外部显示名
            pub fn name(&self) -> &'static str {
                match self {
                    $(PlanNodeKind::$kind => stringify!($kind),)*
                }
            }

            /// 种类到形状的映射表
            pub fn shape(&self) -> NodeShape {
                match self {
                    $(PlanNodeKind::$kind => NodeShape::$shape,)*
                }
            }
        }
    };
}

plan_node_kinds! {
    Start => Leaf,
    // 遍历和读取
    GetNeighbors => SingleInput,
    GetVertices => SingleInput,
    GetEdges => SingleInput,
    IndexScan => SingleInput,
    // 关系算子
    Filter => SingleInput,
    Union => BiInput,
    Intersect => BiInput,
    Minus => BiInput,
    Project => SingleInput,
    Sort => SingleInput,
    Limit => SingleInput,
    Aggregate => SingleInput,
    Dedup => SingleInput,
    // 控制流
    Select => SingleInput,
    Loop => SingleInput,
    PassThrough => SingleInput,
    SwitchSpace => SingleInput,
    // schema 管理
    CreateSpace => SingleDependency,
    CreateTag => SingleDependency,
    CreateEdge => SingleDependency,
    DescSpace => SingleDependency,
    ShowCreateSpace => SingleDependency,
    DescTag => SingleDependency,
    DescEdge => SingleDependency,
    AlterTag => SingleDependency,
    AlterEdge => SingleDependency,
    ShowSpaces => SingleDependency,
    ShowTags => SingleDependency,
    ShowEdges => SingleDependency,
    ShowCreateTag => SingleDependency,
    ShowCreateEdge => SingleDependency,
    DropSpace => SingleDependency,
    DropTag => SingleDependency,
    DropEdge => SingleDependency,
    // 写入
    InsertVertices => SingleDependency,
    InsertEdges => SingleDependency,
    // 运维
    BalanceLeaders => SingleDependency,
    Balance => SingleDependency,
    StopBalance => SingleDependency,
    ShowBalance => SingleDependency,
    SubmitJob => SingleDependency,
    ShowHosts => SingleDependency,
    DataCollect => SingleDependency,
    // 用户与角色
    CreateUser => SingleDependency,
    DropUser => SingleDependency,
    UpdateUser => SingleDependency,
    GrantRole => SingleDependency,
    RevokeRole => SingleDependency,
    ChangePassword => SingleDependency,
    ListUserRoles => SingleDependency,
    ListUsers => SingleDependency,
    ListRoles => SingleDependency,
    // 快照
    CreateSnapshot => SingleDependency,
    DropSnapshot => SingleDependency,
    ShowSnapshots => SingleDependency,
    DataJoin => BiInput,
    DeleteVertices => SingleInput,
    DeleteEdges => SingleInput,
    UpdateVertex => SingleDependency,
    UpdateEdge => SingleDependency,
    ShowParts => SingleDependency,
    ShowCharset => SingleDependency,
    ShowCollation => SingleDependency,
    ShowConfigs => SingleDependency,
    SetConfig => SingleDependency,
    GetConfig => SingleDependency,
}

impl PlanNodeKind {
    /// 写操作节点
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            PlanNodeKind::InsertVertices
                | PlanNodeKind::InsertEdges
                | PlanNodeKind::DeleteVertices
                | PlanNodeKind::DeleteEdges
                | PlanNodeKind::UpdateVertex
                | PlanNodeKind::UpdateEdge
        )
    }

    /// 带分支子计划的控制流节点
    pub fn has_branches(&self) -> bool {
        matches!(self, PlanNodeKind::Select | PlanNodeKind::Loop)
    }
}

impl fmt::Display for PlanNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_start_is_leaf() {
        let leaves: Vec<_> = PlanNodeKind::ALL
            .iter()
            .filter(|k| k.shape() == NodeShape::Leaf)
            .collect();
        assert_eq!(leaves, vec![&PlanNodeKind::Start]);
    }

    #[test]
    fn test_shapes() {
        assert_eq!(PlanNodeKind::Union.shape().arity(), 2);
        assert_eq!(PlanNodeKind::DataJoin.shape().input_var_slots(), 2);
        assert_eq!(PlanNodeKind::Limit.shape().input_var_slots(), 1);
        assert_eq!(PlanNodeKind::CreateSpace.shape().arity(), 1);
        assert_eq!(PlanNodeKind::CreateSpace.shape().input_var_slots(), 0);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(PlanNodeKind::GetNeighbors.to_string(), "GetNeighbors");
        assert_eq!(format!("{}", PlanNodeKind::ShowCreateTag), "ShowCreateTag");
        assert_eq!(PlanNodeKind::ALL.len(), 67);
    }
}
