//! 执行期上下文
//!
//! 变量名到结果历史的映射

pub mod execution_context;

pub use execution_context::{ExecResult, ExecutionContext, ResultState};
