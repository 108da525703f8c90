//! 节点工厂
//!
//! 通过查询上下文创建结构完整的节点：分配ID、生成输出变量名 `__<Kind>_<id>`、
//! 连接依赖、把输入变量默认设为依赖的输出变量，并在符号表中登记读写关系。
//!
//! 之后仍然可以单独替换依赖或输入变量，两者互不影响。
//!
//! 构建失败时不留下任何痕迹：不消耗ID、不登记符号、不向对象池放入表达式。

use super::node_params::{
    CollectKind, ExploreParams, NodeParams, OrderType, YieldColumn,
};
use super::plan_node::PlanNode;
use super::plan_node_kind::{NodeShape, PlanNodeKind};
use crate::core::error::{QueryError, QueryResult};
use crate::core::Expression;
use crate::query::query_context::QueryContext;
use crate::utils::object_pool::{NodeRef, ObjectPool};

/// 输出列名与输入相同的种类
fn preserves_columns(kind: PlanNodeKind) -> bool {
    matches!(
        kind,
        PlanNodeKind::Filter | PlanNodeKind::Limit | PlanNodeKind::Sort | PlanNodeKind::Dedup
    )
}

/// 通用构建入口
///
/// `deps` 的长度必须等于种类的元数，节点读取的变量必须都已登记
pub fn build(
    qctx: &mut QueryContext,
    kind: PlanNodeKind,
    deps: &[NodeRef],
    params: NodeParams,
) -> QueryResult<NodeRef> {
    let shape = kind.shape();
    if deps.len() != shape.arity() {
        return Err(QueryError::PlanningError(format!(
            "{} 需要 {} 个依赖，实际 {} 个",
            kind,
            shape.arity(),
            deps.len()
        )));
    }

    // 先用即将分配的ID组装节点，校验通过后才真正分配
    let id = qctx.current_id();
    let output_var = format!("__{}_{}", kind, id);
    let mut node = PlanNode::new(id, kind).with_params(params);
    node.set_output_var(output_var.clone());

    let dep_vars: Vec<String> = deps
        .iter()
        .map(|d| qctx.obj_pool().node(*d).output_var().to_string())
        .collect();
    for (i, dep) in deps.iter().enumerate() {
        node.set_dep(i, *dep);
    }
    match shape {
        NodeShape::Leaf | NodeShape::SingleDependency => {}
        NodeShape::SingleInput => node.set_input_var(dep_vars[0].clone()),
        NodeShape::BiInput => {
            node.set_left_var(dep_vars[0].clone());
            node.set_right_var(dep_vars[1].clone());
        }
    }

    if preserves_columns(kind) {
        let cols = qctx.obj_pool().node(deps[0]).col_names().to_vec();
        node.set_col_names(cols);
    }

    let reads: Vec<String> = node.input_vars().into_iter().map(str::to_string).collect();
    let symbols = qctx.vctx().symbols();
    if symbols.exists(&output_var) {
        return Err(QueryError::PlanningError(format!(
            "变量 '{}' 已存在",
            output_var
        )));
    }
    if let Some(missing) = reads.iter().find(|var| !symbols.exists(var)) {
        return Err(QueryError::PlanningError(format!(
            "{} 读取的变量 '{}' 未登记",
            kind, missing
        )));
    }

    let allocated = qctx.gen_id();
    debug_assert_eq!(allocated, id);
    let cols = node.col_names().to_vec();
    let symbols = qctx.vctx_mut().symbols_mut();
    symbols.new_dataset(&output_var, cols)?;
    symbols.written_by(&output_var, id)?;
    for var in &reads {
        symbols.read_by(var, id)?;
    }

    Ok(qctx.obj_pool_mut().add_node(node))
}

/// 先构建节点，成功后再把表达式放进对象池并挂上参数
fn build_with<F>(
    qctx: &mut QueryContext,
    kind: PlanNodeKind,
    deps: &[NodeRef],
    make_params: F,
) -> QueryResult<NodeRef>
where
    F: FnOnce(&mut ObjectPool) -> NodeParams,
{
    let node = build(qctx, kind, deps, NodeParams::None)?;
    let pool = qctx.obj_pool_mut();
    let params = make_params(pool);
    pool.node_mut(node).set_params(params);
    Ok(node)
}

pub fn start(qctx: &mut QueryContext) -> QueryResult<NodeRef> {
    build(qctx, PlanNodeKind::Start, &[], NodeParams::None)
}

pub fn filter(
    qctx: &mut QueryContext,
    input: NodeRef,
    condition: Expression,
) -> QueryResult<NodeRef> {
    build_with(qctx, PlanNodeKind::Filter, &[input], |pool| {
        NodeParams::Filter {
            condition: pool.add_expr(condition),
        }
    })
}

/// 投影，列名取别名
pub fn project(
    qctx: &mut QueryContext,
    input: NodeRef,
    columns: Vec<(Expression, String)>,
) -> QueryResult<NodeRef> {
    let col_names: Vec<String> = columns.iter().map(|(_, alias)| alias.clone()).collect();
    let node = build_with(qctx, PlanNodeKind::Project, &[input], |pool| {
        NodeParams::Project {
            columns: columns
                .into_iter()
                .map(|(expr, alias)| YieldColumn::new(pool.add_expr(expr), alias))
                .collect(),
        }
    })?;
    set_col_names(qctx, node, col_names);
    Ok(node)
}

pub fn sort(
    qctx: &mut QueryContext,
    input: NodeRef,
    factors: Vec<(String, OrderType)>,
) -> QueryResult<NodeRef> {
    build(qctx, PlanNodeKind::Sort, &[input], NodeParams::Sort { factors })
}

pub fn limit(
    qctx: &mut QueryContext,
    input: NodeRef,
    offset: i64,
    count: i64,
) -> QueryResult<NodeRef> {
    if offset < 0 || count < 0 {
        return Err(QueryError::PlanningError(format!(
            "Limit 参数非法: offset {}, count {}",
            offset, count
        )));
    }
    build(
        qctx,
        PlanNodeKind::Limit,
        &[input],
        NodeParams::Limit { offset, count },
    )
}

pub fn aggregate(
    qctx: &mut QueryContext,
    input: NodeRef,
    group_keys: Vec<Expression>,
    group_items: Vec<(Expression, String)>,
) -> QueryResult<NodeRef> {
    let col_names: Vec<String> = group_items.iter().map(|(_, alias)| alias.clone()).collect();
    let node = build_with(qctx, PlanNodeKind::Aggregate, &[input], |pool| {
        NodeParams::Aggregate {
            group_keys: group_keys.into_iter().map(|e| pool.add_expr(e)).collect(),
            group_items: group_items
                .into_iter()
                .map(|(e, _)| pool.add_expr(e))
                .collect(),
        }
    })?;
    set_col_names(qctx, node, col_names);
    Ok(node)
}

pub fn dedup(qctx: &mut QueryContext, input: NodeRef) -> QueryResult<NodeRef> {
    build(qctx, PlanNodeKind::Dedup, &[input], NodeParams::None)
}

fn explore(
    qctx: &mut QueryContext,
    kind: PlanNodeKind,
    input: NodeRef,
    params: ExploreParams,
    col_names: Vec<String>,
) -> QueryResult<NodeRef> {
    let node = build(qctx, kind, &[input], NodeParams::Explore(params))?;
    set_col_names(qctx, node, col_names);
    Ok(node)
}

pub fn get_neighbors(
    qctx: &mut QueryContext,
    input: NodeRef,
    params: ExploreParams,
) -> QueryResult<NodeRef> {
    let cols = vec!["_vid".to_string(), "_stats".to_string(), "_edge".to_string()];
    explore(qctx, PlanNodeKind::GetNeighbors, input, params, cols)
}

pub fn get_vertices(
    qctx: &mut QueryContext,
    input: NodeRef,
    params: ExploreParams,
) -> QueryResult<NodeRef> {
    let cols = vec!["_vid".to_string()];
    explore(qctx, PlanNodeKind::GetVertices, input, params, cols)
}

pub fn get_edges(
    qctx: &mut QueryContext,
    input: NodeRef,
    params: ExploreParams,
) -> QueryResult<NodeRef> {
    let cols = vec![
        "_src".to_string(),
        "_type".to_string(),
        "_rank".to_string(),
        "_dst".to_string(),
    ];
    explore(qctx, PlanNodeKind::GetEdges, input, params, cols)
}

pub fn index_scan(
    qctx: &mut QueryContext,
    input: NodeRef,
    index: impl Into<String>,
    filter: Option<Expression>,
) -> QueryResult<NodeRef> {
    let index = index.into();
    build_with(qctx, PlanNodeKind::IndexScan, &[input], |pool| {
        NodeParams::IndexScan {
            index,
            filter: filter.map(|e| pool.add_expr(e)),
        }
    })
}

fn set_op(
    qctx: &mut QueryContext,
    kind: PlanNodeKind,
    left: NodeRef,
    right: NodeRef,
) -> QueryResult<NodeRef> {
    let left_cols = qctx.obj_pool().node(left).col_names().to_vec();
    let right_cols = qctx.obj_pool().node(right).col_names();
    if left_cols != right_cols {
        return Err(QueryError::PlanningError(format!(
            "{} 两侧列名不一致: {:?} vs {:?}",
            kind, left_cols, right_cols
        )));
    }
    let node = build(qctx, kind, &[left, right], NodeParams::None)?;
    set_col_names(qctx, node, left_cols);
    Ok(node)
}

pub fn union(qctx: &mut QueryContext, left: NodeRef, right: NodeRef) -> QueryResult<NodeRef> {
    set_op(qctx, PlanNodeKind::Union, left, right)
}

pub fn intersect(qctx: &mut QueryContext, left: NodeRef, right: NodeRef) -> QueryResult<NodeRef> {
    set_op(qctx, PlanNodeKind::Intersect, left, right)
}

pub fn minus(qctx: &mut QueryContext, left: NodeRef, right: NodeRef) -> QueryResult<NodeRef> {
    set_op(qctx, PlanNodeKind::Minus, left, right)
}

/// 哈希连接，输出列为左右两侧列名拼接
pub fn data_join(
    qctx: &mut QueryContext,
    left: NodeRef,
    right: NodeRef,
    hash_keys: Vec<Expression>,
    probe_keys: Vec<Expression>,
) -> QueryResult<NodeRef> {
    let mut cols = qctx.obj_pool().node(left).col_names().to_vec();
    cols.extend_from_slice(qctx.obj_pool().node(right).col_names());
    let node = build_with(qctx, PlanNodeKind::DataJoin, &[left, right], |pool| {
        NodeParams::DataJoin {
            hash_keys: hash_keys.into_iter().map(|e| pool.add_expr(e)).collect(),
            probe_keys: probe_keys.into_iter().map(|e| pool.add_expr(e)).collect(),
        }
    })?;
    set_col_names(qctx, node, cols);
    Ok(node)
}

pub fn select(
    qctx: &mut QueryContext,
    input: NodeRef,
    condition: Expression,
    if_branch: Option<NodeRef>,
    else_branch: Option<NodeRef>,
) -> QueryResult<NodeRef> {
    build_with(qctx, PlanNodeKind::Select, &[input], |pool| NodeParams::Select {
        if_branch,
        else_branch,
        condition: pool.add_expr(condition),
    })
}

pub fn loop_(
    qctx: &mut QueryContext,
    input: NodeRef,
    body: Option<NodeRef>,
    condition: Expression,
) -> QueryResult<NodeRef> {
    build_with(qctx, PlanNodeKind::Loop, &[input], |pool| NodeParams::Loop {
        body,
        condition: pool.add_expr(condition),
    })
}

pub fn pass_through(qctx: &mut QueryContext, input: NodeRef) -> QueryResult<NodeRef> {
    let cols = qctx.obj_pool().node(input).col_names().to_vec();
    let node = build(qctx, PlanNodeKind::PassThrough, &[input], NodeParams::None)?;
    set_col_names(qctx, node, cols);
    Ok(node)
}

pub fn switch_space(
    qctx: &mut QueryContext,
    input: NodeRef,
    space: impl Into<String>,
) -> QueryResult<NodeRef> {
    let space = space.into();
    let node = build(
        qctx,
        PlanNodeKind::SwitchSpace,
        &[input],
        NodeParams::SwitchSpace {
            space: space.clone(),
        },
    )?;
    qctx.vctx_mut().switch_to_space(space);
    Ok(node)
}

/// 收集若干具名变量的结果，结构上只依赖 `dep`
pub fn data_collect(
    qctx: &mut QueryContext,
    dep: NodeRef,
    collect_kind: CollectKind,
    input_vars: Vec<String>,
) -> QueryResult<NodeRef> {
    build(
        qctx,
        PlanNodeKind::DataCollect,
        &[dep],
        NodeParams::DataCollect {
            collect_kind,
            input_vars,
        },
    )
}

/// 管理类和写入类节点，参数以键值对描述
pub fn admin(
    qctx: &mut QueryContext,
    kind: PlanNodeKind,
    dep: NodeRef,
    attrs: Vec<(String, String)>,
) -> QueryResult<NodeRef> {
    if !matches!(kind.shape(), NodeShape::SingleDependency) && !kind.is_mutation() {
        return Err(QueryError::PlanningError(format!(
            "{} 不是管理类或写入类节点",
            kind
        )));
    }
    build(qctx, kind, &[dep], NodeParams::Attributes(attrs))
}

fn set_col_names(qctx: &mut QueryContext, node: NodeRef, cols: Vec<String>) {
    let var = qctx.obj_pool().node(node).output_var().to_string();
    qctx.vctx_mut().symbols_mut().set_col_names(&var, cols.clone());
    qctx.obj_pool_mut().node_mut(node).set_col_names(cols);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;

    #[test]
    fn test_build_wires_input_var() {
        let mut qctx = QueryContext::default();
        let s = start(&mut qctx).unwrap();
        let f = filter(&mut qctx, s, Expression::constant(Value::Bool(true))).unwrap();

        let node = qctx.obj_pool().node(f);
        assert_eq!(node.id(), 1);
        assert_eq!(node.output_var(), "__Filter_1");
        assert_eq!(node.input_var(), "__Start_0");
        assert_eq!(node.dep(0), s);
        assert!(node.is_ready());

        let symbols = qctx.vctx().symbols();
        assert!(symbols.readers("__Start_0").unwrap().contains(&1));
        assert!(symbols.writers("__Filter_1").unwrap().contains(&1));
    }

    #[test]
    fn test_unregistered_input_leaves_no_trace() {
        let mut qctx = QueryContext::default();
        let mut raw = PlanNode::new(0, PlanNodeKind::Start);
        raw.set_output_var("unregistered");
        let raw = qctx.obj_pool_mut().add_node(raw);

        let err = filter(&mut qctx, raw, Expression::constant(Value::Bool(true))).unwrap_err();
        assert!(matches!(err, QueryError::PlanningError(_)));
        assert_eq!(qctx.obj_pool().node_count(), 1);
        assert_eq!(qctx.obj_pool().expr_count(), 0);
        assert_eq!(qctx.current_id(), 0);
        assert!(qctx.vctx().symbols().is_empty());

        // 失败之后照常构建，ID 从 0 开始
        let s = start(&mut qctx).unwrap();
        let f = filter(&mut qctx, s, Expression::constant(Value::Bool(true))).unwrap();
        assert_eq!(qctx.obj_pool().node(f).output_var(), "__Filter_1");
        assert_eq!(qctx.obj_pool().expr_count(), 1);
    }

    #[test]
    fn test_unregistered_collect_var_is_error() {
        let mut qctx = QueryContext::default();
        let s = start(&mut qctx).unwrap();
        let err = data_collect(
            &mut qctx,
            s,
            CollectKind::RowBasedMove,
            vec!["__Start_0".to_string(), "missing".to_string()],
        )
        .unwrap_err();

        assert!(matches!(err, QueryError::PlanningError(_)));
        assert!(qctx.vctx().symbols().readers("__Start_0").unwrap().is_empty());
        assert_eq!(qctx.vctx().symbols().len(), 1);
        assert_eq!(qctx.current_id(), 1);
    }

    #[test]
    fn test_project_exprs_attached_after_build() {
        let mut qctx = QueryContext::default();
        let s = start(&mut qctx).unwrap();
        let p = project(
            &mut qctx,
            s,
            vec![
                (Expression::input_property("a"), "a".to_string()),
                (Expression::input_property("b"), "b".to_string()),
            ],
        )
        .unwrap();

        assert_eq!(qctx.obj_pool().expr_count(), 2);
        match qctx.obj_pool().node(p).params() {
            NodeParams::Project { columns } => {
                assert_eq!(columns.len(), 2);
                assert_eq!(
                    qctx.obj_pool().expr(columns[1].expr),
                    &Expression::input_property("b")
                );
            }
            other => panic!("unexpected params: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_arity_is_error() {
        let mut qctx = QueryContext::default();
        let s = start(&mut qctx).unwrap();
        let err = build(&mut qctx, PlanNodeKind::Union, &[s], NodeParams::None).unwrap_err();
        assert!(matches!(err, QueryError::PlanningError(_)));
    }

    #[test]
    fn test_columns_are_inherited() {
        let mut qctx = QueryContext::default();
        let s = start(&mut qctx).unwrap();
        let p = project(
            &mut qctx,
            s,
            vec![(Expression::input_property("name"), "name".to_string())],
        )
        .unwrap();
        let l = limit(&mut qctx, p, 0, 10).unwrap();
        let d = dedup(&mut qctx, l).unwrap();

        assert_eq!(qctx.obj_pool().node(d).col_names(), &["name".to_string()]);
    }

    #[test]
    fn test_set_op_requires_same_columns() {
        let mut qctx = QueryContext::default();
        let s = start(&mut qctx).unwrap();
        let p = project(
            &mut qctx,
            s,
            vec![(Expression::input_property("a"), "a".to_string())],
        )
        .unwrap();
        assert!(union(&mut qctx, p, s).is_err());
        assert!(union(&mut qctx, p, p).is_ok());
    }

    #[test]
    fn test_admin_rejects_relational_kind() {
        let mut qctx = QueryContext::default();
        let s = start(&mut qctx).unwrap();
        assert!(admin(&mut qctx, PlanNodeKind::Filter, s, vec![]).is_err());

        let attrs = vec![("name".to_string(), "nba".to_string())];
        let c = admin(&mut qctx, PlanNodeKind::CreateSpace, s, attrs).unwrap();
        let desc = qctx.obj_pool().node(c).explain(qctx.obj_pool());
        assert_eq!(desc.get_description("name"), Some("nba"));
    }
}
