//! 参考执行引擎
//!
//! 按拓扑序逐个执行计划节点，结果发布到执行上下文中节点的输出变量下

pub mod executor;
pub mod plan_scheduler;

pub use executor::{Executor, ExecutorRegistry};
pub use plan_scheduler::PlanScheduler;
