// 核心类型模块
//
// 表达式树与操作符

pub mod expression;
pub mod operators;

pub use expression::{Expression, ExpressionKind};
pub use operators::{BinaryOperator, CastType, UnaryOperator};
