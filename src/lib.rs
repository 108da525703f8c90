//! GraphPlan - 图查询引擎的规划与执行核心
//!
//! 提供查询执行计划的节点图表示、每个查询独占的查询上下文（对象池、ID 生成器、
//! profiling），以及用于检查和改写表达式的访问者框架。

pub mod config;
pub mod core;
pub mod query;
pub mod utils;
