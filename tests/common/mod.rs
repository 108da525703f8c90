//! 集成测试公共工具

#![allow(dead_code)]

use graphplan::core::{DataSet, Expression, Row, Value};
use graphplan::query::planner::plan::factory;
use graphplan::query::QueryContext;
use graphplan::utils::NodeRef;

/// 由整数矩阵构造数据集
pub fn dataset(cols: &[&str], rows: &[&[i64]]) -> Value {
    let mut ds = DataSet::new(cols.iter().map(|c| c.to_string()).collect());
    for row in rows {
        ds.push(Row::new(row.iter().map(|v| Value::Int(*v)).collect()));
    }
    Value::DataSet(ds)
}

/// Start -> Project(name) -> Limit(offset, count)，根设为 Limit
pub fn chain_plan(qctx: &mut QueryContext, offset: i64, count: i64) -> (NodeRef, NodeRef, NodeRef) {
    let start = factory::start(qctx).expect("创建 Start 失败");
    let project = factory::project(
        qctx,
        start,
        vec![(Expression::input_property("name"), "name".to_string())],
    )
    .expect("创建 Project 失败");
    let limit = factory::limit(qctx, project, offset, count).expect("创建 Limit 失败");
    qctx.plan_mut().set_root(limit);
    (start, project, limit)
}
