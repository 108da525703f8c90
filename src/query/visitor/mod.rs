//! 表达式访问器
//!
//! 建立在 `core::expression_visitor` 之上的具体访问器

mod find_any_expr_visitor;
mod rewrite_visitor;
mod variable_visitor;

pub use find_any_expr_visitor::{find_any, FindAnyExprVisitor};
pub use rewrite_visitor::RewriteVisitor;
pub use variable_visitor::VariableVisitor;
