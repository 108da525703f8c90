//! FindAnyExprVisitor - 查找第一个属于目标种类的子表达式
//!
//! 前序、深度优先、从左到右。每个节点先检查自身种类，命中即返回该节点且
//! 不再进入它的子表达式；一旦命中，整棵树的遍历立即停止。

use std::collections::HashSet;
use std::ops::ControlFlow;

use crate::core::expression_visitor::{try_for_each_preorder, walk_expression, ExpressionVisitor};
use crate::core::{Expression, ExpressionKind};

#[derive(Debug)]
pub struct FindAnyExprVisitor<'a> {
    targets: HashSet<ExpressionKind>,
    found: Option<&'a Expression>,
    visited: Vec<ExpressionKind>,
}

impl<'a> FindAnyExprVisitor<'a> {
    /// 目标种类集合不能为空
    pub fn new(targets: impl IntoIterator<Item = ExpressionKind>) -> Self {
        let targets: HashSet<ExpressionKind> = targets.into_iter().collect();
        assert!(!targets.is_empty(), "查找的表达式种类集合不能为空");
        Self {
            targets,
            found: None,
            visited: Vec::new(),
        }
    }

    /// 查找第一个匹配的子表达式
    pub fn find(&mut self, expr: &'a Expression) -> Option<&'a Expression> {
        self.found = None;
        self.visited.clear();
        if let ControlFlow::Break(hit) = expr.accept(self) {
            self.found = Some(hit);
        }
        self.found
    }

    pub fn found(&self) -> Option<&'a Expression> {
        self.found
    }

    /// 上一次查找访问过的节点数
    pub fn visited(&self) -> usize {
        self.visited.len()
    }

    /// 上一次查找依次访问过的节点种类，命中的节点在最后
    pub fn visited_kinds(&self) -> &[ExpressionKind] {
        &self.visited
    }
}

impl<'a> ExpressionVisitor<'a> for FindAnyExprVisitor<'a> {
    type Break = &'a Expression;

    fn visit(&mut self, expr: &'a Expression) -> ControlFlow<Self::Break> {
        self.visited.push(expr.kind());
        if self.targets.contains(&expr.kind()) {
            return ControlFlow::Break(expr);
        }
        walk_expression(self, expr)
    }
}

/// 闭包版本，语义与 `FindAnyExprVisitor` 相同
pub fn find_any<'a>(
    expr: &'a Expression,
    targets: &HashSet<ExpressionKind>,
) -> Option<&'a Expression> {
    // 前序第一个命中的节点，其祖先都未命中
    match try_for_each_preorder(expr, &mut |e: &'a Expression| {
        if targets.contains(&e.kind()) {
            ControlFlow::Break(e)
        } else {
            ControlFlow::Continue(())
        }
    }) {
        ControlFlow::Break(hit) => Some(hit),
        ControlFlow::Continue(()) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BinaryOperator, Value};

    fn sample() -> Expression {
        // (1 + f([2,3]))
        Expression::binary(
            Expression::constant(1i64),
            BinaryOperator::Add,
            Expression::function_call(
                "f",
                vec![Expression::List(vec![
                    Expression::constant(2i64),
                    Expression::constant(3i64),
                ])],
            ),
        )
    }

    #[test]
    fn test_stops_at_first_match() {
        let expr = sample();
        let mut visitor = FindAnyExprVisitor::new([ExpressionKind::FunctionCall]);
        let hit = visitor.find(&expr).unwrap();

        assert_eq!(hit.kind(), ExpressionKind::FunctionCall);
        assert_eq!(visitor.visited(), 3);
        assert_eq!(
            visitor.visited_kinds(),
            &[ExpressionKind::Add, ExpressionKind::Constant, ExpressionKind::FunctionCall]
        );
    }

    #[test]
    fn test_root_match_does_not_descend() {
        let expr = sample();
        let mut visitor = FindAnyExprVisitor::new([ExpressionKind::Add, ExpressionKind::Constant]);

        assert!(std::ptr::eq(visitor.find(&expr).unwrap(), &expr));
        assert_eq!(visitor.visited(), 1);
    }

    #[test]
    fn test_absent_kind_visits_everything() {
        let expr = sample();
        let mut visitor = FindAnyExprVisitor::new([ExpressionKind::Label]);

        assert!(visitor.find(&expr).is_none());
        assert!(visitor.found().is_none());
        assert_eq!(visitor.visited(), 6);
    }

    #[test]
    fn test_map_keys_are_not_searched() {
        let expr = Expression::Map(vec![
            ("a".to_string(), Expression::constant(Value::Int(1))),
            ("b".to_string(), Expression::label("x")),
        ]);
        let mut visitor = FindAnyExprVisitor::new([ExpressionKind::Label]);

        assert_eq!(visitor.find(&expr), Some(&Expression::label("x")));
    }

    #[test]
    fn test_closure_version_agrees() {
        let expr = sample();
        let targets: HashSet<_> = [ExpressionKind::Constant].into_iter().collect();
        let mut visitor = FindAnyExprVisitor::new(targets.iter().copied());

        let by_visitor = visitor.find(&expr).unwrap();
        let by_fold = find_any(&expr, &targets).unwrap();
        assert!(std::ptr::eq(by_visitor, by_fold));
    }

    #[test]
    #[should_panic(expected = "不能为空")]
    fn test_empty_targets_panics() {
        FindAnyExprVisitor::new(Vec::new());
    }
}
