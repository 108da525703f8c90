//! 错误类型
//!
//! 计划核心内部的不变量违例（未设置的依赖、越界的依赖下标、缺失的 profiling 索引等）
//! 属于规划器或执行引擎的缺陷，直接 panic，不在这里建模。
//! 这里只有协作方（执行器、配置文件）会产生的可恢复错误。

use thiserror::Error;

/// 查询层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("执行错误: {0}")]
    ExecutionError(String),

    #[error("执行器未找到: {0}")]
    ExecutorNotFound(String),

    #[error("规划错误: {0}")]
    PlanningError(String),
}

/// 查询操作结果类型别名
pub type QueryResult<T> = Result<T, QueryError>;

impl QueryError {
    pub fn execution_error<E: std::error::Error>(e: E) -> Self {
        QueryError::ExecutionError(e.to_string())
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置解析错误: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("配置序列化错误: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("无效配置: {0}")]
    Invalid(String),
}
