//! 表达式访问者模式
//!
//! - `ExpressionVisitor`: 按表达式种类分发的访问者 trait，每个复合表达式的处理函数
//!   自己负责递归子表达式，因此递归顺序和提前终止都由访问者决定
//! - `walk_expression`: 对封闭的表达式种类做一次 match 分发
//! - `try_for_each_preorder`: 基于闭包的前序遍历折叠，`Break` 时立即短路
//!
//! 所有处理函数返回 `ControlFlow`，返回 `Break` 后整棵树的遍历停止。

use std::ops::ControlFlow;

use crate::core::types::expression::Expression;
use crate::core::types::operators::{BinaryOperator, CastType, UnaryOperator};
use crate::core::Value;

/// 表达式访问者 trait
///
/// 默认实现按以下顺序递归：一元/类型转换访问操作数；二元先左后右；
/// 函数调用按参数顺序；List/Set 按元素顺序；Map 按存储顺序访问每对的值，键不访问。
/// 叶子表达式默认什么都不做。
pub trait ExpressionVisitor<'a> {
    /// 提前终止时携带的结果
    type Break;

    /// 访问入口
    fn visit(&mut self, expr: &'a Expression) -> ControlFlow<Self::Break> {
        walk_expression(self, expr)
    }

    fn visit_constant(&mut self, _expr: &'a Expression, _value: &'a Value) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn visit_unary(
        &mut self,
        _expr: &'a Expression,
        _op: UnaryOperator,
        operand: &'a Expression,
    ) -> ControlFlow<Self::Break> {
        self.visit(operand)
    }

    fn visit_binary(
        &mut self,
        _expr: &'a Expression,
        _op: BinaryOperator,
        left: &'a Expression,
        right: &'a Expression,
    ) -> ControlFlow<Self::Break> {
        self.visit(left)?;
        self.visit(right)
    }

    fn visit_type_casting(
        &mut self,
        _expr: &'a Expression,
        _target: CastType,
        operand: &'a Expression,
    ) -> ControlFlow<Self::Break> {
        self.visit(operand)
    }

    fn visit_function_call(
        &mut self,
        _expr: &'a Expression,
        _name: &'a str,
        args: &'a [Expression],
    ) -> ControlFlow<Self::Break> {
        walk_items(self, args)
    }

    fn visit_list(&mut self, _expr: &'a Expression, items: &'a [Expression]) -> ControlFlow<Self::Break> {
        walk_items(self, items)
    }

    fn visit_set(&mut self, _expr: &'a Expression, items: &'a [Expression]) -> ControlFlow<Self::Break> {
        walk_items(self, items)
    }

    fn visit_map(
        &mut self,
        _expr: &'a Expression,
        pairs: &'a [(String, Expression)],
    ) -> ControlFlow<Self::Break> {
        for (_, value) in pairs {
            self.visit(value)?;
        }
        ControlFlow::Continue(())
    }

    /// 标签、边、输入、变量、起点、终点属性
    fn visit_property(&mut self, _expr: &'a Expression) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    /// `_src`、`_type`、`_rank`、`_dst`
    fn visit_edge_identity(&mut self, _expr: &'a Expression) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn visit_variable(&mut self, _expr: &'a Expression, _var: &'a str) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn visit_versioned_variable(
        &mut self,
        _expr: &'a Expression,
        _var: &'a str,
        _version: i64,
    ) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn visit_label(&mut self, _expr: &'a Expression, _name: &'a str) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn visit_uuid(&mut self, _expr: &'a Expression) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn visit_vertex(&mut self, _expr: &'a Expression) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn visit_edge(&mut self, _expr: &'a Expression) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }
}

/// 按表达式种类分发到访问者对应的处理函数
pub fn walk_expression<'a, V>(visitor: &mut V, expr: &'a Expression) -> ControlFlow<V::Break>
where
    V: ExpressionVisitor<'a> + ?Sized,
{
    match expr {
        Expression::Constant(value) => visitor.visit_constant(expr, value),
        Expression::Unary { op, operand } => visitor.visit_unary(expr, *op, operand),
        Expression::Binary { op, left, right } => visitor.visit_binary(expr, *op, left, right),
        Expression::TypeCasting { target, operand } => {
            visitor.visit_type_casting(expr, *target, operand)
        }
        Expression::FunctionCall { name, args } => visitor.visit_function_call(expr, name, args),
        Expression::List(items) => visitor.visit_list(expr, items),
        Expression::Set(items) => visitor.visit_set(expr, items),
        Expression::Map(pairs) => visitor.visit_map(expr, pairs),
        Expression::TagProperty { .. }
        | Expression::EdgeProperty { .. }
        | Expression::InputProperty { .. }
        | Expression::VariableProperty { .. }
        | Expression::SourceProperty { .. }
        | Expression::DestinationProperty { .. } => visitor.visit_property(expr),
        Expression::EdgeSrcId { .. }
        | Expression::EdgeType { .. }
        | Expression::EdgeRank { .. }
        | Expression::EdgeDstId { .. } => visitor.visit_edge_identity(expr),
        Expression::Uuid(_) => visitor.visit_uuid(expr),
        Expression::Variable(var) => visitor.visit_variable(expr, var),
        Expression::VersionedVariable { var, version } => {
            visitor.visit_versioned_variable(expr, var, *version)
        }
        Expression::Label(name) => visitor.visit_label(expr, name),
        Expression::Vertex => visitor.visit_vertex(expr),
        Expression::Edge => visitor.visit_edge(expr),
    }
}

/// 按顺序访问一组子表达式，遇到 `Break` 立即返回
pub fn walk_items<'a, V>(visitor: &mut V, items: &'a [Expression]) -> ControlFlow<V::Break>
where
    V: ExpressionVisitor<'a> + ?Sized,
{
    for item in items {
        visitor.visit(item)?;
    }
    ControlFlow::Continue(())
}

/// 前序、深度优先、从左到右地对每个节点调用 `f`，`f` 返回 `Break` 时整体短路
pub fn try_for_each_preorder<'a, B, F>(expr: &'a Expression, f: &mut F) -> ControlFlow<B>
where
    F: FnMut(&'a Expression) -> ControlFlow<B>,
{
    f(expr)?;
    for child in expr.children() {
        try_for_each_preorder(child, f)?;
    }
    ControlFlow::Continue(())
}

impl Expression {
    /// 双分派入口
    pub fn accept<'a, V>(&'a self, visitor: &mut V) -> ControlFlow<V::Break>
    where
        V: ExpressionVisitor<'a> + ?Sized,
    {
        visitor.visit(self)
    }
}
