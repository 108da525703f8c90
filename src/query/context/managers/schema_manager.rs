//! Schema管理器接口

/// Schema管理器
pub trait SchemaManager: Send + Sync + std::fmt::Debug {
    /// 图空间是否存在
    fn has_space(&self, space: &str) -> bool;
    /// 图空间下的 tag 名称
    fn list_tags(&self, space: &str) -> Vec<String>;
    /// 图空间下的边类型名称
    fn list_edge_types(&self, space: &str) -> Vec<String>;
}
