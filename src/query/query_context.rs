//! 查询上下文
//!
//! 每个查询独占一个查询上下文，它持有：
//!
//! - 对象池：规划期间所有互相引用的节点和表达式
//! - ID 生成器：从 0 开始为计划节点分配ID
//! - 执行计划和可选的计划描述（EXPLAIN / PROFILE 时才有）
//! - 验证上下文和执行上下文
//! - 外部协作者：请求上下文、Schema管理器、存储客户端、元数据客户端、字符集
//!
//! 这些状态随查询上下文一起销毁，不会有任何对象活得比它更久。
//! 规划是单线程的，这里不做任何同步。

use std::fmt;
use std::sync::Arc;

use crate::config::PlannerConfig;
use crate::core::error::{QueryError, QueryResult};
use crate::query::context::execution::ExecutionContext;
use crate::query::context::managers::{CharsetInfo, MetaClient, SchemaManager, StorageClient};
use crate::query::context::validate::ValidateContext;
use crate::query::planner::plan::core::explain::{PlanDescription, ProfilingStats};
use crate::query::planner::plan::{ExecutionPlan, NodeShape};
use crate::query::request_context::RequestContext;
use crate::utils::id_gen::IdGenerator;
use crate::utils::object_pool::{NodeRef, ObjectPool};

/// 外部协作者
///
/// 完整构造时全部提供，独立执行（测试、内嵌）时整体缺省
struct Collaborators {
    rctx: Arc<RequestContext>,
    schema_manager: Arc<dyn SchemaManager>,
    storage_client: Arc<dyn StorageClient>,
    meta_client: Arc<dyn MetaClient>,
    charset_info: Arc<CharsetInfo>,
}

/// 查询上下文
pub struct QueryContext {
    collaborators: Option<Collaborators>,
    obj_pool: ObjectPool,
    id_gen: IdGenerator,
    ep: ExecutionPlan,
    vctx: ValidateContext,
    ectx: ExecutionContext,
    plan_description: Option<PlanDescription>,
}

impl QueryContext {
    /// 完整构造，挂接请求和全部外部协作者
    pub fn new(
        rctx: Arc<RequestContext>,
        schema_manager: Arc<dyn SchemaManager>,
        storage_client: Arc<dyn StorageClient>,
        meta_client: Arc<dyn MetaClient>,
        charset_info: Arc<CharsetInfo>,
    ) -> Self {
        let mut qctx = Self::new_standalone();
        qctx.collaborators = Some(Collaborators {
            rctx,
            schema_manager,
            storage_client,
            meta_client,
            charset_info,
        });
        qctx
    }

    /// 不挂接外部协作者，用于独立执行和测试
    pub fn new_standalone() -> Self {
        Self {
            collaborators: None,
            obj_pool: ObjectPool::new(),
            id_gen: IdGenerator::new(0),
            ep: ExecutionPlan::new(),
            vctx: ValidateContext::new(),
            ectx: ExecutionContext::new(),
            plan_description: None,
        }
    }

    /// 按规划器配置构造独立的查询上下文
    pub fn with_config(config: &PlannerConfig) -> Self {
        let mut qctx = Self::new_standalone();
        qctx.obj_pool = ObjectPool::with_capacity(config.object_pool_capacity);
        if config.enable_profiling {
            qctx.enable_profiling(config.explain_format.clone());
        }
        qctx
    }

    pub fn is_standalone(&self) -> bool {
        self.collaborators.is_none()
    }

    pub fn rctx(&self) -> Option<&RequestContext> {
        self.collaborators.as_ref().map(|c| c.rctx.as_ref())
    }

    pub fn schema_manager(&self) -> Option<&Arc<dyn SchemaManager>> {
        self.collaborators.as_ref().map(|c| &c.schema_manager)
    }

    pub fn storage_client(&self) -> Option<&Arc<dyn StorageClient>> {
        self.collaborators.as_ref().map(|c| &c.storage_client)
    }

    pub fn meta_client(&self) -> Option<&Arc<dyn MetaClient>> {
        self.collaborators.as_ref().map(|c| &c.meta_client)
    }

    pub fn charset_info(&self) -> Option<&CharsetInfo> {
        self.collaborators.as_ref().map(|c| c.charset_info.as_ref())
    }

    /// 获取对象池
    pub fn obj_pool(&self) -> &ObjectPool {
        &self.obj_pool
    }

    pub fn obj_pool_mut(&mut self) -> &mut ObjectPool {
        &mut self.obj_pool
    }

    /// 生成下一个节点ID
    pub fn gen_id(&mut self) -> i64 {
        self.id_gen.id()
    }

    pub fn current_id(&self) -> i64 {
        self.id_gen.current_value()
    }

    pub fn plan(&self) -> &ExecutionPlan {
        &self.ep
    }

    pub fn plan_mut(&mut self) -> &mut ExecutionPlan {
        &mut self.ep
    }

    pub fn vctx(&self) -> &ValidateContext {
        &self.vctx
    }

    pub fn vctx_mut(&mut self) -> &mut ValidateContext {
        &mut self.vctx
    }

    pub fn ectx(&self) -> &ExecutionContext {
        &self.ectx
    }

    pub fn ectx_mut(&mut self) -> &mut ExecutionContext {
        &mut self.ectx
    }

    /// 开启 EXPLAIN / PROFILE
    pub fn enable_profiling(&mut self, format: impl Into<String>) {
        let format = format.into();
        self.ep.set_format(format.clone());
        self.plan_description = Some(PlanDescription::with_format(format));
    }

    pub fn is_profiling(&self) -> bool {
        self.plan_description.is_some()
    }

    pub fn plan_description(&self) -> Option<&PlanDescription> {
        self.plan_description.as_ref()
    }

    pub fn plan_description_mut(&mut self) -> Option<&mut PlanDescription> {
        self.plan_description.as_mut()
    }

    /// 规划结束、执行开始前生成节点描述，只在开启了 profiling 时生效
    ///
    /// 描述只生成一次，再次调用不会改动已有描述和已累积的统计
    pub fn fill_plan_description(&mut self) {
        if let Some(desc) = self.plan_description.as_mut() {
            if !desc.is_empty() {
                log::debug!("计划 {} 的描述已存在，跳过生成", self.ep.id);
                return;
            }
            self.ep.fill_plan_description(&self.obj_pool, desc);
        }
    }

    /// 为节点追加一条性能统计
    ///
    /// 未开启 profiling 时什么都不做。开启后节点ID必须已经在描述索引里，
    /// 同一节点多次执行（比如在循环体内）按调用顺序累积。
    pub fn add_profiling_data(&mut self, node_id: i64, stats: ProfilingStats) {
        let Some(desc) = self.plan_description.as_mut() else {
            return;
        };
        match desc.get_node_desc_mut(node_id) {
            Some(node_desc) => {
                log::trace!("节点 {} 追加性能统计: {} 行", node_id, stats.rows);
                node_desc.add_profile(stats);
            }
            None => panic!("计划描述中不存在节点 {}", node_id),
        }
    }

    /// 修改节点的输出变量
    ///
    /// 读者以对象池中各节点当前的输入变量为准，已经有读者的变量名不能再改。
    /// 旧变量没有登记在符号表里时返回错误，节点保持不变。
    pub fn rename_output_var(&mut self, node: NodeRef, new_var: &str) -> QueryResult<()> {
        let (node_id, old_var, cols) = {
            let n = self.obj_pool.node(node);
            (n.id(), n.output_var().to_string(), n.col_names().to_vec())
        };
        if !self.vctx.symbols().exists(&old_var) {
            return Err(QueryError::PlanningError(format!(
                "节点 {} 的输出变量 '{}' 未登记",
                node_id, old_var
            )));
        }
        let readers: Vec<i64> = self
            .obj_pool
            .nodes()
            .filter(|(_, n)| n.input_vars().contains(&old_var.as_str()))
            .map(|(_, n)| n.id())
            .collect();
        assert!(
            readers.is_empty(),
            "变量 {} 已被节点 {:?} 读取，不能改名",
            old_var,
            readers
        );

        let symbols = self.vctx.symbols_mut();
        if !symbols.exists(new_var) {
            symbols.new_dataset(new_var, cols)?;
        }
        symbols.delete_written_by(&old_var, node_id)?;
        symbols.written_by(new_var, node_id)?;
        self.obj_pool.node_mut(node).set_output_var(new_var);
        Ok(())
    }

    /// 把节点的一个输入槽位改为读取另一个已登记的变量，并同步符号表中的读者
    ///
    /// 单输入节点只有槽位 0；双输入节点槽位 0 为左输入，1 为右输入。
    pub fn rebind_input_var(&mut self, node: NodeRef, slot: usize, var: &str) -> QueryResult<()> {
        let n = self.obj_pool.node(node);
        let (node_id, shape) = (n.id(), n.shape());
        let old_var = match (shape, slot) {
            (NodeShape::SingleInput, 0) => n.input_var(),
            (NodeShape::BiInput, 0) => n.left_input_var(),
            (NodeShape::BiInput, 1) => n.right_input_var(),
            _ => panic!(
                "{}({}) 的形状 {:?} 没有输入槽位 {}",
                n.kind(),
                node_id,
                shape,
                slot
            ),
        }
        .to_string();

        if !self.vctx.symbols().exists(var) {
            return Err(QueryError::PlanningError(format!("变量 '{}' 不存在", var)));
        }

        let n = self.obj_pool.node_mut(node);
        match (shape, slot) {
            (NodeShape::BiInput, 0) => n.set_left_var(var),
            (NodeShape::BiInput, _) => n.set_right_var(var),
            _ => n.set_input_var(var),
        }
        // 双输入节点两侧可能读同一个变量
        let still_reads_old = n.input_vars().contains(&old_var.as_str());

        let symbols = self.vctx.symbols_mut();
        if symbols.exists(&old_var) && !still_reads_old {
            symbols.update_read_by(&old_var, var, node_id)?;
        } else {
            symbols.read_by(var, node_id)?;
        }
        log::trace!("节点 {} 输入槽位 {}: {} -> {}", node_id, slot, old_var, var);
        Ok(())
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::new_standalone()
    }
}

impl fmt::Debug for QueryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryContext")
            .field("standalone", &self.is_standalone())
            .field("plan_id", &self.ep.id)
            .field("nodes", &self.obj_pool.node_count())
            .field("exprs", &self.obj_pool.expr_count())
            .field("next_id", &self.id_gen.current_value())
            .field("profiling", &self.is_profiling())
            .finish()
    }
}
