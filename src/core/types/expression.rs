//! 表达式类型定义
//!
//! 计划节点引用的谓词、投影等表达式树。
//! 表达式种类是封闭集合，每个变体对应一个 `ExpressionKind`。

use crate::core::types::operators::{BinaryOperator, CastType, UnaryOperator};
use crate::core::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 表达式种类
///
/// 二元和一元表达式按操作符细分，便于按种类查找（如只查找 AND）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpressionKind {
    Constant,
    // 算术
    Add,
    Minus,
    Multiply,
    Division,
    Mod,
    // 一元
    UnaryPlus,
    UnaryNegate,
    UnaryNot,
    UnaryIncr,
    UnaryDecr,
    IsNull,
    IsNotNull,
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
    TypeCasting,
    FunctionCall,
    // 容器
    List,
    Set,
    Map,
    // 属性访问
    TagProperty,
    EdgeProperty,
    InputProperty,
    VarProperty,
    SrcProperty,
    DstProperty,
    // 边标识
    EdgeSrc,
    EdgeType,
    EdgeRank,
    EdgeDst,
    Uuid,
    Var,
    VersionedVar,
    Label,
    Vertex,
    Edge,
}

/// 表达式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Constant(Value),

    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    TypeCasting {
        target: CastType,
        operand: Box<Expression>,
    },

    FunctionCall {
        name: String,
        args: Vec<Expression>,
    },

    List(Vec<Expression>),
    Set(Vec<Expression>),
    /// 键值对按存储顺序保存，遍历只访问值
    Map(Vec<(String, Expression)>),

    TagProperty { tag: String, prop: String },
    EdgeProperty { edge: String, prop: String },
    /// `$-.prop`
    InputProperty { prop: String },
    /// `$var.prop`
    VariableProperty { var: String, prop: String },
    /// `$^.tag.prop`
    SourceProperty { tag: String, prop: String },
    /// `$$.tag.prop`
    DestinationProperty { tag: String, prop: String },

    EdgeSrcId { edge: String },
    EdgeType { edge: String },
    EdgeRank { edge: String },
    EdgeDstId { edge: String },

    Uuid(String),
    Variable(String),
    VersionedVariable { var: String, version: i64 },
    Label(String),
    Vertex,
    Edge,
}

impl Expression {
    pub fn constant(value: impl Into<Value>) -> Self {
        Expression::Constant(value.into())
    }

    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn type_casting(target: CastType, operand: Expression) -> Self {
        Expression::TypeCasting {
            target,
            operand: Box::new(operand),
        }
    }

    pub fn function_call(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            args,
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn label(name: impl Into<String>) -> Self {
        Expression::Label(name.into())
    }

    pub fn input_property(prop: impl Into<String>) -> Self {
        Expression::InputProperty { prop: prop.into() }
    }

    pub fn variable_property(var: impl Into<String>, prop: impl Into<String>) -> Self {
        Expression::VariableProperty {
            var: var.into(),
            prop: prop.into(),
        }
    }

    pub fn edge_property(edge: impl Into<String>, prop: impl Into<String>) -> Self {
        Expression::EdgeProperty {
            edge: edge.into(),
            prop: prop.into(),
        }
    }

    pub fn tag_property(tag: impl Into<String>, prop: impl Into<String>) -> Self {
        Expression::TagProperty {
            tag: tag.into(),
            prop: prop.into(),
        }
    }

    /// 获取表达式种类
    pub fn kind(&self) -> ExpressionKind {
        match self {
            Expression::Constant(_) => ExpressionKind::Constant,
            Expression::Unary { op, .. } => op.kind(),
            Expression::Binary { op, .. } => op.kind(),
            Expression::TypeCasting { .. } => ExpressionKind::TypeCasting,
            Expression::FunctionCall { .. } => ExpressionKind::FunctionCall,
            Expression::List(_) => ExpressionKind::List,
            Expression::Set(_) => ExpressionKind::Set,
            Expression::Map(_) => ExpressionKind::Map,
            Expression::TagProperty { .. } => ExpressionKind::TagProperty,
            Expression::EdgeProperty { .. } => ExpressionKind::EdgeProperty,
            Expression::InputProperty { .. } => ExpressionKind::InputProperty,
            Expression::VariableProperty { .. } => ExpressionKind::VarProperty,
            Expression::SourceProperty { .. } => ExpressionKind::SrcProperty,
            Expression::DestinationProperty { .. } => ExpressionKind::DstProperty,
            Expression::EdgeSrcId { .. } => ExpressionKind::EdgeSrc,
            Expression::EdgeType { .. } => ExpressionKind::EdgeType,
            Expression::EdgeRank { .. } => ExpressionKind::EdgeRank,
            Expression::EdgeDstId { .. } => ExpressionKind::EdgeDst,
            Expression::Uuid(_) => ExpressionKind::Uuid,
            Expression::Variable(_) => ExpressionKind::Var,
            Expression::VersionedVariable { .. } => ExpressionKind::VersionedVar,
            Expression::Label(_) => ExpressionKind::Label,
            Expression::Vertex => ExpressionKind::Vertex,
            Expression::Edge => ExpressionKind::Edge,
        }
    }

    /// 直接子表达式，按遍历顺序排列
    ///
    /// Map 只返回值，键不是表达式
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Unary { operand, .. } | Expression::TypeCasting { operand, .. } => {
                vec![operand.as_ref()]
            }
            Expression::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expression::FunctionCall { args, .. } => args.iter().collect(),
            Expression::List(items) | Expression::Set(items) => items.iter().collect(),
            Expression::Map(pairs) => pairs.iter().map(|(_, v)| v).collect(),
            _ => Vec::new(),
        }
    }

    /// 是否为叶子表达式
    pub fn is_leaf(&self) -> bool {
        !matches!(
            self,
            Expression::Unary { .. }
                | Expression::Binary { .. }
                | Expression::TypeCasting { .. }
                | Expression::FunctionCall { .. }
                | Expression::List(_)
                | Expression::Set(_)
                | Expression::Map(_)
        )
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Expression]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(v) => write!(f, "{}", v),
            Expression::Unary { op, operand } => {
                if op.is_postfix() {
                    write!(f, "{}{}", operand, op.symbol())
                } else {
                    write!(f, "{}({})", op.symbol(), operand)
                }
            }
            Expression::Binary { op, left, right } => {
                write!(f, "({}{}{})", left, op.symbol(), right)
            }
            Expression::TypeCasting { target, operand } => {
                write!(f, "({}){}", target.name(), operand)
            }
            Expression::FunctionCall { name, args } => {
                write!(f, "{}(", name)?;
                write_items(f, args)?;
                write!(f, ")")
            }
            Expression::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            Expression::Set(items) => {
                write!(f, "{{")?;
                write_items(f, items)?;
                write!(f, "}}")
            }
            Expression::Map(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", k, v)?;
                }
                write!(f, "}}")
            }
            Expression::TagProperty { tag, prop } => write!(f, "{}.{}", tag, prop),
            Expression::EdgeProperty { edge, prop } => write!(f, "{}.{}", edge, prop),
            Expression::InputProperty { prop } => write!(f, "$-.{}", prop),
            Expression::VariableProperty { var, prop } => write!(f, "${}.{}", var, prop),
            Expression::SourceProperty { tag, prop } => write!(f, "$^.{}.{}", tag, prop),
            Expression::DestinationProperty { tag, prop } => write!(f, "$$.{}.{}", tag, prop),
            Expression::EdgeSrcId { edge } => write!(f, "{}._src", edge),
            Expression::EdgeType { edge } => write!(f, "{}._type", edge),
            Expression::EdgeRank { edge } => write!(f, "{}._rank", edge),
            Expression::EdgeDstId { edge } => write!(f, "{}._dst", edge),
            Expression::Uuid(field) => write!(f, "uuid(\"{}\")", field),
            Expression::Variable(var) => write!(f, "${}", var),
            Expression::VersionedVariable { var, version } => write!(f, "${}{{{}}}", var, version),
            Expression::Label(name) => write!(f, "{}", name),
            Expression::Vertex => write!(f, "VERTEX"),
            Expression::Edge => write!(f, "EDGE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_by_operator() {
        let and = Expression::binary(
            Expression::constant(true),
            BinaryOperator::LogicalAnd,
            Expression::constant(false),
        );
        assert_eq!(and.kind(), ExpressionKind::LogicalAnd);

        let not_null = Expression::unary(UnaryOperator::IsNotNull, Expression::variable("v"));
        assert_eq!(not_null.kind(), ExpressionKind::IsNotNull);
    }

    #[test]
    fn test_map_children_skip_keys() {
        let map = Expression::Map(vec![
            ("a".to_string(), Expression::constant(1i64)),
            ("b".to_string(), Expression::label("x")),
        ]);
        let children = map.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].kind(), ExpressionKind::Label);
    }

    #[test]
    fn test_display() {
        let expr = Expression::binary(
            Expression::constant(1i64),
            BinaryOperator::Add,
            Expression::function_call(
                "f",
                vec![Expression::List(vec![
                    Expression::constant(2i64),
                    Expression::constant(3i64),
                ])],
            ),
        );
        assert_eq!(expr.to_string(), "(1+f([2,3]))");
        assert_eq!(Expression::edge_property("study", "start_year").to_string(), "study.start_year");
        assert_eq!(Expression::input_property("name").to_string(), "$-.name");
    }
}
