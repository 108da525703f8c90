//! 计划调度器
//!
//! 单线程地按拓扑序执行。任一执行器失败即中止剩余节点并返回该错误，
//! 已经发布的结果保留在执行上下文中。

use std::time::Instant;

use super::executor::ExecutorRegistry;
use crate::core::error::QueryResult;
use crate::query::planner::plan::core::explain::ProfilingStats;
use crate::query::query_context::QueryContext;

pub struct PlanScheduler {
    registry: ExecutorRegistry,
}

impl PlanScheduler {
    pub fn new(registry: ExecutorRegistry) -> Self {
        Self { registry }
    }

    pub fn registry_mut(&mut self) -> &mut ExecutorRegistry {
        &mut self.registry
    }

    pub fn execute(&self, qctx: &mut QueryContext) -> QueryResult<()> {
        let total_start = Instant::now();
        let order = qctx.plan().topological_order(qctx.obj_pool());
        log::debug!(
            "计划 {} 执行顺序: {:?}",
            qctx.plan().id,
            order
                .iter()
                .map(|n| qctx.obj_pool().node(*n).id())
                .collect::<Vec<_>>()
        );

        qctx.fill_plan_description();

        for node_ref in order {
            let node = qctx.obj_pool().node(node_ref);
            assert!(
                node.is_ready(),
                "{}({}) 的依赖或输入变量未设置",
                node.kind(),
                node.id()
            );
            let (kind, node_id) = (node.kind(), node.id());
            let output_var = node.output_var().to_string();

            let mut executor = self.registry.create(kind)?;
            let exec_start = Instant::now();
            let value = executor
                .execute(qctx.obj_pool().node(node_ref), qctx)
                .inspect_err(|e| log::warn!("{}({}) 执行失败: {}", kind, node_id, e))?;
            let exec_us = exec_start.elapsed().as_micros() as i64;

            let rows = value.row_count();
            qctx.ectx_mut().set_result(output_var.clone(), value);
            log::debug!("{}({}) 完成，结果写入 {}", kind, node_id, output_var);

            if qctx.is_profiling() {
                let total_us = total_start.elapsed().as_micros() as i64;
                qctx.add_profiling_data(node_id, ProfilingStats::new(rows, exec_us, total_us));
            }
        }
        Ok(())
    }
}

impl Default for PlanScheduler {
    fn default() -> Self {
        Self::new(ExecutorRegistry::with_builtin())
    }
}
