//! VariableVisitor - 收集表达式引用的变量名
//!
//! 包括 `$var`、带版本的变量以及 `$var.prop` 中的变量，按访问顺序去重。

use std::convert::Infallible;
use std::ops::ControlFlow;

use crate::core::expression_visitor::ExpressionVisitor;
use crate::core::Expression;

#[derive(Debug, Default)]
pub struct VariableVisitor {
    variables: Vec<String>,
}

impl VariableVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect_variables(&mut self, expr: &Expression) -> Vec<String> {
        self.variables.clear();
        let _ = expr.accept(self);
        self.variables.clone()
    }

    pub fn has_variables(&mut self, expr: &Expression) -> bool {
        !self.collect_variables(expr).is_empty()
    }

    fn add(&mut self, var: &str) {
        if !self.variables.iter().any(|v| v == var) {
            self.variables.push(var.to_string());
        }
    }
}

impl<'a> ExpressionVisitor<'a> for VariableVisitor {
    type Break = Infallible;

    fn visit_variable(&mut self, _expr: &'a Expression, var: &'a str) -> ControlFlow<Infallible> {
        self.add(var);
        ControlFlow::Continue(())
    }

    fn visit_versioned_variable(
        &mut self,
        _expr: &'a Expression,
        var: &'a str,
        _version: i64,
    ) -> ControlFlow<Infallible> {
        self.add(var);
        ControlFlow::Continue(())
    }

    fn visit_property(&mut self, expr: &'a Expression) -> ControlFlow<Infallible> {
        if let Expression::VariableProperty { var, .. } = expr {
            self.add(var);
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BinaryOperator;

    #[test]
    fn test_collects_in_order_without_duplicates() {
        let expr = Expression::binary(
            Expression::variable_property("b", "age"),
            BinaryOperator::LogicalAnd,
            Expression::function_call(
                "f",
                vec![
                    Expression::variable("a"),
                    Expression::variable("b"),
                    Expression::VersionedVariable {
                        var: "c".to_string(),
                        version: -1,
                    },
                ],
            ),
        );

        let mut visitor = VariableVisitor::new();
        assert_eq!(visitor.collect_variables(&expr), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_no_variables() {
        let mut visitor = VariableVisitor::new();
        assert!(!visitor.has_variables(&Expression::input_property("name")));
    }
}
