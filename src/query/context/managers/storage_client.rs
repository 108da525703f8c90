//! 存储客户端接口

/// 存储客户端
pub trait StorageClient: Send + Sync + std::fmt::Debug {
    /// 图空间的分片数
    fn part_count(&self, space: &str) -> usize;
}
