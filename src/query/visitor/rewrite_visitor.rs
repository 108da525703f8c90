//! RewriteVisitor - 基于匹配器和重写器的通用表达式改写
//!
//! 自底向上：先改写子表达式，再用匹配器检查改写后的当前节点。
//! 原表达式不被修改，返回一棵新树。

use crate::core::Expression;
use crate::utils::object_pool::{ExprRef, ObjectPool};

pub struct RewriteVisitor<M, R>
where
    M: Fn(&Expression) -> bool,
    R: Fn(&Expression) -> Expression,
{
    matcher: M,
    rewriter: R,
}

impl<M, R> RewriteVisitor<M, R>
where
    M: Fn(&Expression) -> bool,
    R: Fn(&Expression) -> Expression,
{
    pub fn new(matcher: M, rewriter: R) -> Self {
        Self { matcher, rewriter }
    }

    /// 一次性改写
    pub fn transform(expr: &Expression, matcher: M, rewriter: R) -> Expression {
        Self::new(matcher, rewriter).rewrite(expr)
    }

    pub fn rewrite(&self, expr: &Expression) -> Expression {
        let rebuilt = self.rewrite_children(expr);
        if (self.matcher)(&rebuilt) {
            (self.rewriter)(&rebuilt)
        } else {
            rebuilt
        }
    }

    /// 改写对象池中的表达式，返回是否有变化
    pub fn rewrite_in_pool(&self, pool: &mut ObjectPool, expr: ExprRef) -> bool {
        let rewritten = self.rewrite(pool.expr(expr));
        if &rewritten == pool.expr(expr) {
            return false;
        }
        *pool.expr_mut(expr) = rewritten;
        true
    }

    fn rewrite_all(&self, items: &[Expression]) -> Vec<Expression> {
        items.iter().map(|item| self.rewrite(item)).collect()
    }

    fn rewrite_children(&self, expr: &Expression) -> Expression {
        match expr {
            Expression::Unary { op, operand } => Expression::unary(*op, self.rewrite(operand)),
            Expression::Binary { op, left, right } => {
                Expression::binary(self.rewrite(left), *op, self.rewrite(right))
            }
            Expression::TypeCasting { target, operand } => {
                Expression::type_casting(*target, self.rewrite(operand))
            }
            Expression::FunctionCall { name, args } => {
                Expression::function_call(name.clone(), self.rewrite_all(args))
            }
            Expression::List(items) => Expression::List(self.rewrite_all(items)),
            Expression::Set(items) => Expression::Set(self.rewrite_all(items)),
            Expression::Map(pairs) => Expression::Map(
                pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), self.rewrite(v)))
                    .collect(),
            ),
            leaf => leaf.clone(),
        }
    }
}
