//! 执行器接口与注册表
//!
//! 执行器通过 `qctx.ectx()` 读取具名输入变量，返回的值由调度器发布。

use std::collections::HashMap;

use crate::core::error::{QueryError, QueryResult};
use crate::core::{DataSet, Value};
use crate::query::planner::plan::{NodeParams, PlanNode, PlanNodeKind};
use crate::query::query_context::QueryContext;

/// 执行器
pub trait Executor: Send {
    fn execute(&mut self, node: &PlanNode, qctx: &QueryContext) -> QueryResult<Value>;
}

type ExecutorFactory = Box<dyn Fn() -> Box<dyn Executor> + Send + Sync>;

/// 节点种类到执行器工厂的映射
#[derive(Default)]
pub struct ExecutorRegistry {
    factories: HashMap<PlanNodeKind, ExecutorFactory>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册内置执行器：Start、PassThrough、Limit、Dedup 和三种集合运算
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(PlanNodeKind::Start, || Box::new(StartExecutor));
        registry.register(PlanNodeKind::PassThrough, || Box::new(PassThroughExecutor));
        registry.register(PlanNodeKind::Limit, || Box::new(LimitExecutor));
        registry.register(PlanNodeKind::Dedup, || Box::new(DedupExecutor));
        for kind in [PlanNodeKind::Union, PlanNodeKind::Intersect, PlanNodeKind::Minus] {
            registry.register(kind, move || Box::new(SetOpExecutor { kind }));
        }
        registry
    }

    /// 注册执行器工厂，已有的同种类注册会被覆盖
    pub fn register<F>(&mut self, kind: PlanNodeKind, factory: F)
    where
        F: Fn() -> Box<dyn Executor> + Send + Sync + 'static,
    {
        self.factories.insert(kind, Box::new(factory));
    }

    pub fn contains(&self, kind: PlanNodeKind) -> bool {
        self.factories.contains_key(&kind)
    }

    pub fn create(&self, kind: PlanNodeKind) -> QueryResult<Box<dyn Executor>> {
        self.factories
            .get(&kind)
            .map(|factory| factory())
            .ok_or_else(|| QueryError::ExecutorNotFound(kind.name().to_string()))
    }
}

fn input_dataset<'q>(qctx: &'q QueryContext, node: &PlanNode, var: &str) -> QueryResult<&'q DataSet> {
    qctx.ectx().get_value(var).as_dataset().ok_or_else(|| {
        QueryError::ExecutionError(format!(
            "{}({}) 的输入变量 {} 不是数据集",
            node.kind(),
            node.id(),
            var
        ))
    })
}

struct StartExecutor;

impl Executor for StartExecutor {
    fn execute(&mut self, _node: &PlanNode, _qctx: &QueryContext) -> QueryResult<Value> {
        Ok(Value::DataSet(DataSet::default()))
    }
}

struct PassThroughExecutor;

impl Executor for PassThroughExecutor {
    fn execute(&mut self, node: &PlanNode, qctx: &QueryContext) -> QueryResult<Value> {
        Ok(qctx.ectx().get_value(node.input_var()).clone())
    }
}

/// 跳过 offset 行后最多取 count 行
struct LimitExecutor;

impl Executor for LimitExecutor {
    fn execute(&mut self, node: &PlanNode, qctx: &QueryContext) -> QueryResult<Value> {
        let NodeParams::Limit { offset, count } = node.params() else {
            return Err(QueryError::ExecutionError(format!(
                "Limit({}) 缺少参数",
                node.id()
            )));
        };
        let input = input_dataset(qctx, node, node.input_var())?;
        let mut result = DataSet::new(input.col_names.clone());
        result.rows = input
            .rows
            .iter()
            .skip(*offset as usize)
            .take(*count as usize)
            .cloned()
            .collect();
        Ok(Value::DataSet(result))
    }
}

struct DedupExecutor;

impl Executor for DedupExecutor {
    fn execute(&mut self, node: &PlanNode, qctx: &QueryContext) -> QueryResult<Value> {
        let input = input_dataset(qctx, node, node.input_var())?;
        let mut result = DataSet::new(input.col_names.clone());
        for row in &input.rows {
            if !result.rows.contains(row) {
                result.push(row.clone());
            }
        }
        Ok(Value::DataSet(result))
    }
}

struct SetOpExecutor {
    kind: PlanNodeKind,
}

impl Executor for SetOpExecutor {
    fn execute(&mut self, node: &PlanNode, qctx: &QueryContext) -> QueryResult<Value> {
        let left = input_dataset(qctx, node, node.left_input_var())?;
        let right = input_dataset(qctx, node, node.right_input_var())?;
        if left.col_names != right.col_names {
            return Err(QueryError::ExecutionError(format!(
                "{}({}) 两侧列名不一致",
                node.kind(),
                node.id()
            )));
        }

        let mut result = DataSet::new(left.col_names.clone());
        result.rows = match self.kind {
            PlanNodeKind::Union => left.rows.iter().chain(&right.rows).cloned().collect(),
            PlanNodeKind::Intersect => left
                .rows
                .iter()
                .filter(|row| right.rows.contains(row))
                .cloned()
                .collect(),
            _ => left
                .rows
                .iter()
                .filter(|row| !right.rows.contains(row))
                .cloned()
                .collect(),
        };
        Ok(Value::DataSet(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executor() {
        let registry = ExecutorRegistry::new();
        let err = registry.create(PlanNodeKind::Filter).err().unwrap();
        assert_eq!(err, QueryError::ExecutorNotFound("Filter".to_string()));
    }

    #[test]
    fn test_builtin_kinds() {
        let registry = ExecutorRegistry::with_builtin();
        assert!(registry.contains(PlanNodeKind::Start));
        assert!(registry.contains(PlanNodeKind::Minus));
        assert!(!registry.contains(PlanNodeKind::GetNeighbors));
    }
}
