//! 操作符类型定义

use serde::{Deserialize, Serialize};

use super::expression::ExpressionKind;

/// 二元操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    // 算术
    Add,
    Minus,
    Multiply,
    Division,
    Mod,
    // 关系
    RelEq,
    RelNe,
    RelLt,
    RelLe,
    RelGt,
    RelGe,
    RelIn,
    RelNotIn,
    Contains,
    // 逻辑
    LogicalAnd,
    LogicalOr,
    LogicalXor,
}

impl BinaryOperator {
    /// 操作符符号
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Division => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::RelEq => "==",
            BinaryOperator::RelNe => "!=",
            BinaryOperator::RelLt => "<",
            BinaryOperator::RelLe => "<=",
            BinaryOperator::RelGt => ">",
            BinaryOperator::RelGe => ">=",
            BinaryOperator::RelIn => " IN ",
            BinaryOperator::RelNotIn => " NOT IN ",
            BinaryOperator::Contains => " CONTAINS ",
            BinaryOperator::LogicalAnd => " AND ",
            BinaryOperator::LogicalOr => " OR ",
            BinaryOperator::LogicalXor => " XOR ",
        }
    }

    /// 该操作符对应的表达式种类
    pub fn kind(&self) -> ExpressionKind {
        match self {
            BinaryOperator::Add => ExpressionKind::Add,
            BinaryOperator::Minus => ExpressionKind::Minus,
            BinaryOperator::Multiply => ExpressionKind::Multiply,
            BinaryOperator::Division => ExpressionKind::Division,
            BinaryOperator::Mod => ExpressionKind::Mod,
            BinaryOperator::RelEq => ExpressionKind::RelEq,
            BinaryOperator::RelNe => ExpressionKind::RelNe,
            BinaryOperator::RelLt => ExpressionKind::RelLt,
            BinaryOperator::RelLe => ExpressionKind::RelLe,
            BinaryOperator::RelGt => ExpressionKind::RelGt,
            BinaryOperator::RelGe => ExpressionKind::RelGe,
            BinaryOperator::RelIn => ExpressionKind::RelIn,
            BinaryOperator::RelNotIn => ExpressionKind::RelNotIn,
            BinaryOperator::Contains => ExpressionKind::Contains,
            BinaryOperator::LogicalAnd => ExpressionKind::LogicalAnd,
            BinaryOperator::LogicalOr => ExpressionKind::LogicalOr,
            BinaryOperator::LogicalXor => ExpressionKind::LogicalXor,
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(
            self,
            BinaryOperator::LogicalAnd | BinaryOperator::LogicalOr | BinaryOperator::LogicalXor
        )
    }
}

/// 一元操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Plus,
    Negate,
    Not,
    Increment,
    Decrement,
    IsNull,
    IsNotNull,
}

impl UnaryOperator {
    pub fn kind(&self) -> ExpressionKind {
        match self {
            UnaryOperator::Plus => ExpressionKind::UnaryPlus,
            UnaryOperator::Negate => ExpressionKind::UnaryNegate,
            UnaryOperator::Not => ExpressionKind::UnaryNot,
            UnaryOperator::Increment => ExpressionKind::UnaryIncr,
            UnaryOperator::Decrement => ExpressionKind::UnaryDecr,
            UnaryOperator::IsNull => ExpressionKind::IsNull,
            UnaryOperator::IsNotNull => ExpressionKind::IsNotNull,
        }
    }

    /// 后缀形式的操作符（`x IS NULL`、`x++`）
    pub fn is_postfix(&self) -> bool {
        matches!(
            self,
            UnaryOperator::Increment
                | UnaryOperator::Decrement
                | UnaryOperator::IsNull
                | UnaryOperator::IsNotNull
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Negate => "-",
            UnaryOperator::Not => "!",
            UnaryOperator::Increment => "++",
            UnaryOperator::Decrement => "--",
            UnaryOperator::IsNull => " IS NULL",
            UnaryOperator::IsNotNull => " IS NOT NULL",
        }
    }
}

/// 类型转换的目标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastType {
    Bool,
    Int,
    Float,
    String,
}

impl CastType {
    pub fn name(&self) -> &'static str {
        match self {
            CastType::Bool => "BOOL",
            CastType::Int => "INT",
            CastType::Float => "FLOAT",
            CastType::String => "STRING",
        }
    }
}
