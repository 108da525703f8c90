//! 元数据客户端接口

/// 元数据客户端
pub trait MetaClient: Send + Sync + std::fmt::Debug {
    /// 所有图空间名称
    fn list_spaces(&self) -> Vec<String>;
    /// 元数据服务是否就绪
    fn is_ready(&self) -> bool;
}
