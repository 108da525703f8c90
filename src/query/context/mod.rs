//! 查询上下文的组成部分
//!
//! - `symbol/` - 符号表
//! - `validate/` - 验证上下文
//! - `execution/` - 执行上下文
//! - `managers/` - 外部协作者接口

pub mod execution;
pub mod managers;
pub mod symbol;
pub mod validate;

pub use execution::{ExecResult, ExecutionContext, ResultState};
pub use managers::{CharsetInfo, MetaClient, SchemaManager, StorageClient};
pub use symbol::{Symbol, SymbolTable};
pub use validate::ValidateContext;
