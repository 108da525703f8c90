//! 对象池模块
//!
//! 每个查询独占一个对象池，规划期间创建的计划节点和表达式都分配在这里，
//! 查询上下文销毁时一起释放。
//!
//! 对象之间不持有引用，而是持有池内句柄（下标）。池只追加不回收，
//! 同一个查询内句柄永不复用，句柄在池存活期间始终有效。
//! 每个存储区有进程内唯一的编号，句柄带着它，拿到别的池里解析会 panic。

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::Expression;
use crate::query::planner::plan::PlanNode;

/// 池内对象句柄
pub struct Handle<T> {
    arena: u64,
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(arena: u64, index: usize) -> Self {
        Self {
            arena,
            index,
            _marker: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.arena == other.arena && self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.arena.hash(state);
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.arena, self.index)
    }
}

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(0);

/// 只追加的类型化存储区
#[derive(Debug)]
pub struct Arena<T> {
    id: u64,
    items: Vec<T>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn alloc(&mut self, item: T) -> Handle<T> {
        let handle = Handle::new(self.id, self.items.len());
        self.items.push(item);
        handle
    }

    fn check(&self, handle: Handle<T>) {
        if handle.arena != self.id || handle.index >= self.items.len() {
            panic!(
                "句柄 {:?} 不属于当前对象池（编号 {}，长度 {}）",
                handle,
                self.id,
                self.items.len()
            );
        }
    }

    pub fn get(&self, handle: Handle<T>) -> &T {
        self.check(handle);
        &self.items[handle.index]
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> &mut T {
        self.check(handle);
        &mut self.items[handle.index]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        let id = self.id;
        self.items
            .iter()
            .enumerate()
            .map(move |(i, item)| (Handle::new(id, i), item))
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// 计划节点句柄
pub type NodeRef = Handle<PlanNode>;

/// 表达式句柄
pub type ExprRef = Handle<Expression>;

/// 查询级对象池
#[derive(Debug, Default)]
pub struct ObjectPool {
    nodes: Arena<PlanNode>,
    exprs: Arena<Expression>,
}

impl ObjectPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            exprs: Arena::with_capacity(capacity),
        }
    }

    /// 放入计划节点
    pub fn add_node(&mut self, node: PlanNode) -> NodeRef {
        log::trace!("对象池分配计划节点: {}({})", node.kind(), node.id());
        self.nodes.alloc(node)
    }

    /// 放入表达式
    pub fn add_expr(&mut self, expr: Expression) -> ExprRef {
        self.exprs.alloc(expr)
    }

    pub fn node(&self, node: NodeRef) -> &PlanNode {
        self.nodes.get(node)
    }

    pub fn node_mut(&mut self, node: NodeRef) -> &mut PlanNode {
        self.nodes.get_mut(node)
    }

    pub fn expr(&self, expr: ExprRef) -> &Expression {
        self.exprs.get(expr)
    }

    pub fn expr_mut(&mut self, expr: ExprRef) -> &mut Expression {
        self.exprs.get_mut(expr)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeRef, &PlanNode)> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }
}
