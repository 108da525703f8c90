pub mod error;
pub mod expression_visitor;
pub mod types;
pub mod value;

// 错误类型
pub use error::{ConfigError, QueryError, QueryResult};

// 核心数据类型
pub use value::{DataSet, Row, Value};

// 表达式系统类型
pub use types::expression::{Expression, ExpressionKind};
pub use types::operators::{BinaryOperator, CastType, UnaryOperator};

pub use expression_visitor::ExpressionVisitor;
