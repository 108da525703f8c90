//! 执行计划结构定义
//!
//! 计划本身只记录根节点句柄，节点都在查询的对象池里。

use std::collections::{HashMap, HashSet, VecDeque};

use crate::query::planner::plan::core::explain::{PlanDescription, PlanNodeBranchInfo};
use crate::utils::id_gen::EPIdGenerator;
use crate::utils::object_pool::{NodeRef, ObjectPool};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// 执行计划
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    /// 计划的唯一ID，进程内递增
    pub id: i64,

    /// 计划图的根节点
    pub root: Option<NodeRef>,

    /// 优化时间（微秒）
    pub optimize_time_in_us: i64,

    /// 输出格式
    pub format: String,
}

impl ExecutionPlan {
    pub fn new() -> Self {
        Self {
            id: EPIdGenerator::instance().id(),
            root: None,
            optimize_time_in_us: 0,
            format: String::new(),
        }
    }

    pub fn set_root(&mut self, root: NodeRef) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<NodeRef> {
        self.root
    }

    pub fn set_optimize_time(&mut self, time_us: i64) {
        self.optimize_time_in_us = time_us;
    }

    pub fn set_format(&mut self, format: impl Into<String>) {
        self.format = format.into();
    }

    /// 依赖在前的拓扑序
    ///
    /// 只沿结构依赖展开，被多个节点共享的依赖只出现一次。存在环时 panic。
    pub fn topological_order(&self, pool: &ObjectPool) -> Vec<NodeRef> {
        let Some(root) = self.root else {
            return Vec::new();
        };

        let mut marks: HashMap<NodeRef, Mark> = HashMap::new();
        let mut order = Vec::new();
        // (节点, 是否已展开依赖)
        let mut stack = vec![(root, false)];

        while let Some((node_ref, expanded)) = stack.pop() {
            if expanded {
                marks.insert(node_ref, Mark::Done);
                order.push(node_ref);
                continue;
            }
            match marks.get(&node_ref) {
                Some(Mark::Done) => continue,
                Some(Mark::Visiting) => {
                    let node = pool.node(node_ref);
                    panic!("计划图存在环: {}({})", node.kind(), node.id());
                }
                None => {}
            }

            marks.insert(node_ref, Mark::Visiting);
            stack.push((node_ref, true));
            let node = pool.node(node_ref);
            for dep in node.deps().into_iter().rev() {
                match marks.get(&dep) {
                    Some(Mark::Done) => {}
                    Some(Mark::Visiting) => {
                        panic!("计划图存在环: {}({})", node.kind(), node.id());
                    }
                    None => stack.push((dep, false)),
                }
            }
        }

        order
    }

    /// 为计划中的每个节点生成描述
    ///
    /// 除结构依赖外还会展开 Loop 的循环体和 Select 的两个分支，
    /// 分支根节点带上分支信息。`desc` 必须还没有任何节点描述。
    pub fn fill_plan_description(&self, pool: &ObjectPool, desc: &mut PlanDescription) {
        assert!(
            desc.is_empty(),
            "计划 {} 的描述已经生成过（{} 个节点）",
            self.id,
            desc.plan_node_descs.len()
        );
        desc.optimize_time_in_us = self.optimize_time_in_us;
        if desc.format.is_empty() {
            desc.format = self.format.clone();
        }

        let Some(root) = self.root else {
            return;
        };

        let mut visited: HashSet<NodeRef> = HashSet::new();
        let mut queue: VecDeque<(NodeRef, Option<PlanNodeBranchInfo>)> = VecDeque::new();
        queue.push_back((root, None));

        while let Some((node_ref, branch_info)) = queue.pop_front() {
            let node = pool.node(node_ref);
            if !visited.insert(node_ref) {
                if let (Some(info), Some(existing)) =
                    (branch_info, desc.get_node_desc_mut(node.id()))
                {
                    existing.set_branch_info(info);
                }
                continue;
            }

            let mut node_desc = node.explain(pool);
            if let Some(info) = branch_info {
                node_desc.set_branch_info(info);
            }
            desc.add_node_desc(node_desc);

            if node.kind().has_branches() {
                for (branch, is_do_branch) in node.params().branches() {
                    queue.push_back((
                        branch,
                        Some(PlanNodeBranchInfo::new(is_do_branch, node.id())),
                    ));
                }
            }
            for dep in node.deps() {
                queue.push_back((dep, None));
            }
        }

        log::debug!(
            "计划 {} 描述生成完成，共 {} 个节点",
            self.id,
            desc.plan_node_descs.len()
        );
    }
}

impl Default for ExecutionPlan {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::planner::plan::{PlanNode, PlanNodeKind};

    fn node(pool: &mut ObjectPool, id: i64, kind: PlanNodeKind, deps: &[NodeRef]) -> NodeRef {
        let mut n = PlanNode::new(id, kind);
        for (i, d) in deps.iter().enumerate() {
            n.set_dep(i, *d);
        }
        pool.add_node(n)
    }

    fn position(order: &[NodeRef], n: NodeRef) -> usize {
        order.iter().position(|x| *x == n).unwrap()
    }

    #[test]
    fn test_empty_plan() {
        let pool = ObjectPool::new();
        let plan = ExecutionPlan::new();
        assert!(plan.topological_order(&pool).is_empty());
    }

    #[test]
    fn test_diamond_visits_shared_dep_once() {
        let mut pool = ObjectPool::new();
        let start = node(&mut pool, 0, PlanNodeKind::Start, &[]);
        let a = node(&mut pool, 1, PlanNodeKind::Filter, &[start]);
        let b = node(&mut pool, 2, PlanNodeKind::Project, &[start]);
        let union = node(&mut pool, 3, PlanNodeKind::Union, &[a, b]);

        let mut plan = ExecutionPlan::new();
        plan.set_root(union);
        let order = plan.topological_order(&pool);

        assert_eq!(order.len(), 4);
        assert_eq!(order[0], start);
        assert!(position(&order, a) < position(&order, union));
        assert!(position(&order, b) < position(&order, union));
        assert_eq!(order[3], union);
    }

    #[test]
    fn test_aliased_bi_input() {
        let mut pool = ObjectPool::new();
        let start = node(&mut pool, 0, PlanNodeKind::Start, &[]);
        let minus = node(&mut pool, 1, PlanNodeKind::Minus, &[start, start]);

        let mut plan = ExecutionPlan::new();
        plan.set_root(minus);
        assert_eq!(plan.topological_order(&pool), vec![start, minus]);
    }

    #[test]
    #[should_panic(expected = "存在环")]
    fn test_cycle_panics() {
        let mut pool = ObjectPool::new();
        let start = node(&mut pool, 0, PlanNodeKind::Start, &[]);
        let a = node(&mut pool, 1, PlanNodeKind::Filter, &[start]);
        let b = node(&mut pool, 2, PlanNodeKind::Filter, &[a]);
        pool.node_mut(a).set_dep(0, b);

        let mut plan = ExecutionPlan::new();
        plan.set_root(b);
        plan.topological_order(&pool);
    }

    #[test]
    #[should_panic(expected = "描述已经生成过")]
    fn test_fill_into_non_empty_description_panics() {
        let mut pool = ObjectPool::new();
        let start = node(&mut pool, 0, PlanNodeKind::Start, &[]);
        let mut plan = ExecutionPlan::new();
        plan.set_root(start);

        let mut desc = PlanDescription::new();
        plan.fill_plan_description(&pool, &mut desc);
        assert_eq!(desc.plan_node_descs.len(), 1);
        plan.fill_plan_description(&pool, &mut desc);
    }

    #[test]
    fn test_plan_ids_increase() {
        let a = ExecutionPlan::new();
        let b = ExecutionPlan::new();
        assert!(b.id > a.id);
    }
}
