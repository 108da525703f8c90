//! 计划节点图集成测试
//!
//! 测试范围:
//! - 各形状的依赖槽位读写
//! - 结构依赖与具名输入变量相互独立
//! - 拓扑序与计划描述（含分支信息）
//! - 计划描述的序列化

mod common;

use graphplan::core::{BinaryOperator, Expression, Value};
use graphplan::query::planner::plan::{
    factory, CollectKind, EdgeDirection, ExploreParams, NodeShape, PlanDescription, PlanNode,
    PlanNodeKind, ProfilingStats,
};
use graphplan::query::QueryContext;
use graphplan::utils::ObjectPool;

#[test]
fn test_dep_returns_last_set_value_for_every_shape() {
    let mut pool = ObjectPool::new();
    let a = pool.add_node(PlanNode::new(0, PlanNodeKind::Start));
    let b = pool.add_node(PlanNode::new(1, PlanNodeKind::Start));

    for kind in PlanNodeKind::ALL {
        let mut node = PlanNode::new(100, *kind);
        let arity = kind.shape().arity();
        for i in 0..arity {
            node.set_dep(i, a);
            node.set_dep(i, b);
        }
        for i in 0..arity {
            assert_eq!(node.dep(i), b, "{} 的第 {} 个依赖", kind, i);
        }
        assert_eq!(node.dependencies().len(), arity);
    }
}

#[test]
fn test_replacing_dependency_keeps_identity() {
    let mut qctx = QueryContext::default();
    let (start, project, limit) = common::chain_plan(&mut qctx, 0, 3);
    let other = factory::start(&mut qctx).unwrap();

    qctx.obj_pool_mut().node_mut(limit).set_dep(0, other);
    let node = qctx.obj_pool().node(limit);

    assert_eq!(node.dep(0), other);
    assert_eq!(node.id(), 2);
    assert_eq!(node.kind(), PlanNodeKind::Limit);
    // 输入变量不随依赖改变
    assert_eq!(node.input_var(), qctx.obj_pool().node(project).output_var());
    assert_ne!(start, other);
}

#[test]
fn test_input_var_decoupled_from_dependency() {
    let mut qctx = QueryContext::default();
    let start = factory::start(&mut qctx).unwrap();
    let first = factory::dedup(&mut qctx, start).unwrap();
    let second = factory::pass_through(&mut qctx, start).unwrap();

    // 结构上依赖 first，却读取 second 发布的变量
    let var = qctx.obj_pool().node(second).output_var().to_string();
    let reader = factory::dedup(&mut qctx, first).unwrap();
    qctx.obj_pool_mut().node_mut(reader).set_input_var(var.clone());

    let node = qctx.obj_pool().node(reader);
    assert_eq!(node.dep(0), first);
    assert_eq!(node.input_var(), var);
    let desc = node.explain(qctx.obj_pool());
    assert_eq!(desc.get_description("inputVar"), Some(var.as_str()));
    assert_eq!(desc.dependencies, Some(vec![qctx.obj_pool().node(first).id()]));
}

#[test]
fn test_bi_input_aliasing_explain() {
    let mut qctx = QueryContext::default();
    let start = factory::start(&mut qctx).unwrap();
    let minus = factory::minus(&mut qctx, start, start).unwrap();
    qctx.obj_pool_mut().node_mut(minus).set_right_var("__other");

    let node = qctx.obj_pool().node(minus);
    assert_eq!(node.shape(), NodeShape::BiInput);
    assert_eq!(node.left(), start);
    assert_eq!(node.right(), start);

    let desc = node.explain(qctx.obj_pool());
    assert_eq!(desc.dependencies, Some(vec![0, 0]));
    assert_eq!(desc.get_description("leftVar"), Some("__Start_0"));
    assert_eq!(desc.get_description("rightVar"), Some("__other"));
}

#[test]
#[should_panic(expected = "不支持")]
fn test_input_var_on_admin_node_panics() {
    let mut qctx = QueryContext::default();
    let start = factory::start(&mut qctx).unwrap();
    let show = factory::admin(&mut qctx, PlanNodeKind::ShowSpaces, start, vec![]).unwrap();
    qctx.obj_pool().node(show).input_var();
}

#[test]
fn test_topological_order_puts_dependencies_first() {
    let mut qctx = QueryContext::default();
    let start = factory::start(&mut qctx).unwrap();
    let mut params = ExploreParams::new("nba");
    params.schemas = vec!["like".to_string()];
    params.direction = EdgeDirection::Both;
    let gn = factory::get_neighbors(&mut qctx, start, params).unwrap();
    let left = factory::dedup(&mut qctx, gn).unwrap();
    let right = factory::pass_through(&mut qctx, gn).unwrap();
    let union = factory::union(&mut qctx, left, right).unwrap();
    qctx.plan_mut().set_root(union);

    let order = qctx.plan().topological_order(qctx.obj_pool());
    assert_eq!(order.len(), 5);
    for (i, node_ref) in order.iter().enumerate() {
        for dep in qctx.obj_pool().node(*node_ref).deps() {
            let pos = order.iter().position(|n| *n == dep).unwrap();
            assert!(pos < i);
        }
    }
}

#[test]
fn test_fill_description_with_branches() {
    let mut qctx = QueryContext::default();
    qctx.enable_profiling("row");

    let start = factory::start(&mut qctx).unwrap();
    let body_start = factory::start(&mut qctx).unwrap();
    let body = factory::dedup(&mut qctx, body_start).unwrap();
    let cond = Expression::binary(
        Expression::variable("i"),
        BinaryOperator::RelLt,
        Expression::constant(Value::Int(3)),
    );
    let lp = factory::loop_(&mut qctx, start, Some(body), cond).unwrap();

    let then_start = factory::start(&mut qctx).unwrap();
    let sel = factory::select(
        &mut qctx,
        lp,
        Expression::constant(Value::Bool(true)),
        Some(then_start),
        None,
    )
    .unwrap();
    let collect = factory::data_collect(
        &mut qctx,
        sel,
        CollectKind::RowBasedMove,
        vec!["__Dedup_2".to_string()],
    )
    .unwrap();
    qctx.plan_mut().set_root(collect);
    qctx.fill_plan_description();

    let desc = qctx.plan_description().unwrap();
    assert_eq!(desc.plan_node_descs.len(), 7);

    let body_desc = desc.get_node_desc(2).unwrap();
    let info = body_desc.branch_info.unwrap();
    assert!(info.is_do_branch);
    assert_eq!(info.condition_node_id, 3);

    let then_desc = desc.get_node_desc(4).unwrap();
    assert_eq!(then_desc.branch_info.unwrap().condition_node_id, 5);

    let loop_desc = desc.get_node_desc(3).unwrap();
    assert_eq!(loop_desc.get_description("loopBody"), Some("2"));
    assert_eq!(loop_desc.get_description("condition"), Some("($i<3)"));

    let collect_desc = desc.get_node_desc(6).unwrap();
    assert_eq!(collect_desc.get_description("inputVars"), Some("__Dedup_2"));
    assert!(collect_desc.branch_info.is_none());
}

#[test]
fn test_description_round_trips_through_json() {
    let mut qctx = QueryContext::default();
    qctx.enable_profiling("json");
    let (_, _, limit) = common::chain_plan(&mut qctx, 1, 2);
    qctx.fill_plan_description();
    let limit_id = qctx.obj_pool().node(limit).id();
    qctx.add_profiling_data(limit_id, ProfilingStats::new(2, 10, 20).with_stat("version", "0"));
    qctx.add_profiling_data(limit_id, ProfilingStats::new(1, 5, 30).with_stat("version", "1"));

    let desc = qctx.plan_description().unwrap();
    let json = desc.to_json().unwrap();
    let back = PlanDescription::from_json(&json).unwrap();
    assert_eq!(&back, desc);

    let profiles = back.get_node_desc(limit_id).unwrap().profiles.as_ref().unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[1].other_stats.get("version").map(String::as_str), Some("1"));
    assert!(back.render().contains("\"plan_node_descs\""));
}
