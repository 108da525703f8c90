// 查询模块
//
// - context: 符号表、验证上下文、执行上下文和外部协作者接口
// - planner: 计划节点图、执行计划和 EXPLAIN 描述
// - visitor: 表达式访问器
// - scheduler: 按拓扑序执行计划的参考引擎

pub mod context;
pub mod planner;
pub mod query_context;
pub mod request_context;
pub mod scheduler;
pub mod visitor;

pub use crate::core::{QueryError, QueryResult};
pub use query_context::QueryContext;
pub use request_context::RequestContext;
