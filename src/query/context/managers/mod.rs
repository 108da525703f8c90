//! 外部协作者接口
//!
//! 查询上下文只持有这些对象并交给执行器使用，本身不调用它们。

pub mod charset;
pub mod meta_client;
pub mod schema_manager;
pub mod storage_client;

pub use charset::CharsetInfo;
pub use meta_client::MetaClient;
pub use schema_manager::SchemaManager;
pub use storage_client::StorageClient;
