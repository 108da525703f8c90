//! 计划节点
//!
//! 执行计划中的一个算子。所有种类共用同一个结构体，依赖槽位和具名输入
//! 变量槽位的数量在构造时由 `PlanNodeKind::shape()` 决定。
//!
//! 结构依赖决定执行顺序和图的形状；具名输入变量决定执行时从执行上下文
//! 读哪个结果。两者相互独立：节点可以结构上依赖一个生产者，却读取另一个
//! 名字下发布的数据，多个节点也可以读取同一个名字而彼此没有父子关系。
//!
//! 依赖访问越界、读取未设置的依赖、在错误形状上调用左右输入接口都是
//! 规划器缺陷，直接 panic。

use super::node_params::NodeParams;
use super::plan_node_kind::{NodeShape, PlanNodeKind};
use crate::query::planner::plan::core::explain::PlanNodeDescription;
use crate::utils::object_pool::{NodeRef, ObjectPool};

#[derive(Debug, Clone)]
pub struct PlanNode {
    id: i64,
    kind: PlanNodeKind,
    output_var: String,
    col_names: Vec<String>,
    dependencies: Vec<Option<NodeRef>>,
    input_vars: Vec<String>,
    params: NodeParams,
}

impl PlanNode {
    /// 创建一个没有设置任何依赖的节点
    pub fn new(id: i64, kind: PlanNodeKind) -> Self {
        let shape = kind.shape();
        Self {
            id,
            kind,
            output_var: String::new(),
            col_names: Vec::new(),
            dependencies: vec![None; shape.arity()],
            input_vars: vec![String::new(); shape.input_var_slots()],
            params: NodeParams::None,
        }
    }

    pub fn with_params(mut self, params: NodeParams) -> Self {
        self.params = params;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn kind(&self) -> PlanNodeKind {
        self.kind
    }

    pub fn shape(&self) -> NodeShape {
        self.kind.shape()
    }

    pub fn output_var(&self) -> &str {
        &self.output_var
    }

    /// 直接设置输出变量名
    ///
    /// 不维护符号表，已有读者的变量应通过 `QueryContext::rename_output_var` 修改
    pub fn set_output_var(&mut self, var: impl Into<String>) {
        self.output_var = var.into();
    }

    pub fn col_names(&self) -> &[String] {
        &self.col_names
    }

    pub fn set_col_names(&mut self, cols: Vec<String>) {
        self.col_names = cols;
    }

    pub fn params(&self) -> &NodeParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut NodeParams {
        &mut self.params
    }

    pub fn set_params(&mut self, params: NodeParams) {
        self.params = params;
    }

    /// 读取第 `index` 个依赖
    pub fn dep(&self, index: usize) -> NodeRef {
        assert!(
            index < self.dependencies.len(),
            "{}({}) 的依赖下标 {} 超出元数 {}",
            self.kind,
            self.id,
            index,
            self.dependencies.len()
        );
        match self.dependencies[index] {
            Some(dep) => dep,
            None => panic!("{}({}) 的第 {} 个依赖未设置", self.kind, self.id, index),
        }
    }

    /// 替换第 `index` 个依赖槽位，节点身份不变
    pub fn set_dep(&mut self, index: usize, dep: NodeRef) {
        assert!(
            index < self.dependencies.len(),
            "{}({}) 的依赖下标 {} 超出元数 {}",
            self.kind,
            self.id,
            index,
            self.dependencies.len()
        );
        self.dependencies[index] = Some(dep);
    }

    /// 依赖槽位，未设置的为 None
    pub fn dependencies(&self) -> &[Option<NodeRef>] {
        &self.dependencies
    }

    /// 全部依赖，任一未设置即 panic
    pub fn deps(&self) -> Vec<NodeRef> {
        (0..self.dependencies.len()).map(|i| self.dep(i)).collect()
    }

    /// 所有依赖槽位和输入变量槽位都已填充
    pub fn is_ready(&self) -> bool {
        self.dependencies.iter().all(Option::is_some)
            && self.input_vars.iter().all(|v| !v.is_empty())
    }

    fn expect_shape(&self, expected: &[NodeShape], op: &str) {
        assert!(
            expected.contains(&self.shape()),
            "{}({}) 的形状 {:?} 不支持 {}",
            self.kind,
            self.id,
            self.shape(),
            op
        );
    }

    // ---------- 单依赖 ----------

    pub fn depends_on(&mut self, dep: NodeRef) {
        self.expect_shape(&[NodeShape::SingleDependency, NodeShape::SingleInput], "depends_on");
        self.set_dep(0, dep);
    }

    // ---------- 单输入 ----------

    pub fn input_var(&self) -> &str {
        self.expect_shape(&[NodeShape::SingleInput], "input_var");
        &self.input_vars[0]
    }

    /// 不维护符号表，规划期间改读其它变量应通过 `QueryContext::rebind_input_var`
    pub fn set_input_var(&mut self, var: impl Into<String>) {
        self.expect_shape(&[NodeShape::SingleInput], "set_input_var");
        self.input_vars[0] = var.into();
    }

    // ---------- 双输入 ----------

    pub fn left(&self) -> NodeRef {
        self.expect_shape(&[NodeShape::BiInput], "left");
        self.dep(0)
    }

    pub fn right(&self) -> NodeRef {
        self.expect_shape(&[NodeShape::BiInput], "right");
        self.dep(1)
    }

    pub fn set_left(&mut self, left: NodeRef) {
        self.expect_shape(&[NodeShape::BiInput], "set_left");
        self.set_dep(0, left);
    }

    pub fn set_right(&mut self, right: NodeRef) {
        self.expect_shape(&[NodeShape::BiInput], "set_right");
        self.set_dep(1, right);
    }

    pub fn left_input_var(&self) -> &str {
        self.expect_shape(&[NodeShape::BiInput], "left_input_var");
        &self.input_vars[0]
    }

    pub fn right_input_var(&self) -> &str {
        self.expect_shape(&[NodeShape::BiInput], "right_input_var");
        &self.input_vars[1]
    }

    /// 同 `set_input_var`，不维护符号表
    pub fn set_left_var(&mut self, var: impl Into<String>) {
        self.expect_shape(&[NodeShape::BiInput], "set_left_var");
        self.input_vars[0] = var.into();
    }

    pub fn set_right_var(&mut self, var: impl Into<String>) {
        self.expect_shape(&[NodeShape::BiInput], "set_right_var");
        self.input_vars[1] = var.into();
    }

    /// 节点读取的全部具名变量
    pub fn input_vars(&self) -> Vec<&str> {
        let mut vars: Vec<&str> = self.input_vars.iter().map(String::as_str).collect();
        if let NodeParams::DataCollect { input_vars, .. } = &self.params {
            vars.extend(input_vars.iter().map(String::as_str));
        }
        vars
    }

    /// 生成节点描述
    pub fn explain(&self, pool: &ObjectPool) -> PlanNodeDescription {
        let mut desc = PlanNodeDescription::new(self.kind.name(), self.id)
            .with_output_var(self.output_var.clone())
            .with_col_names(self.col_names.clone());
        desc.set_dependencies(self.deps().iter().map(|d| pool.node(*d).id()).collect());

        match self.shape() {
            NodeShape::Leaf | NodeShape::SingleDependency => {}
            NodeShape::SingleInput => {
                desc.add_description("inputVar", self.input_vars[0].clone());
            }
            NodeShape::BiInput => {
                desc.add_description("leftVar", self.input_vars[0].clone());
                desc.add_description("rightVar", self.input_vars[1].clone());
            }
        }

        self.params.describe(pool, &mut desc);
        desc
    }
}
