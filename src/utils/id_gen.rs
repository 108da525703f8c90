//! ID生成器模块
//!
//! - IdGenerator: 查询内的顺序ID生成，计划节点ID由它分配
//! - EPIdGenerator: 进程级的执行计划ID生成

use std::sync::atomic::{AtomicI64, Ordering};

/// 顺序ID生成器
///
/// 归单个查询上下文独占，不做同步
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: i64,
}

impl IdGenerator {
    /// 创建新的ID生成器，使用指定的初始值
    pub fn new(init: i64) -> Self {
        Self { next: init }
    }

    /// 生成下一个ID
    pub fn id(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// 获取下一个将要分配的值（不递增）
    pub fn current_value(&self) -> i64 {
        self.next
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

/// 执行计划ID生成器 - 单例实现
pub struct EPIdGenerator {
    counter: AtomicI64,
}

impl EPIdGenerator {
    /// 获取单例实例
    pub fn instance() -> &'static Self {
        static INSTANCE: EPIdGenerator = EPIdGenerator {
            counter: AtomicI64::new(0),
        };
        &INSTANCE
    }

    /// 生成下一个执行计划ID
    pub fn id(&self) -> i64 {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generator() {
        let mut gen = IdGenerator::new(0);

        assert_eq!(gen.id(), 0);
        assert_eq!(gen.id(), 1);
        assert_eq!(gen.id(), 2);
        assert_eq!(gen.current_value(), 3);
    }

    #[test]
    fn test_generators_are_independent() {
        let mut a = IdGenerator::default();
        let mut b = IdGenerator::default();

        a.id();
        a.id();
        assert_eq!(b.id(), 0);
        assert_eq!(a.id(), 2);
    }

    #[test]
    fn test_ep_id_generator() {
        let gen = EPIdGenerator::instance();

        let first_id = gen.id();
        let second_id = gen.id();

        assert!(second_id > first_id);
    }
}
