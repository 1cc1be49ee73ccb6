pub mod ast;
pub mod error;
pub mod parser;

pub use ast::{
    ArithmeticOperator, Axis, EqualityOperator, Expression, LocationPath, LogicalOperator,
    NodeTest, NodeTypeTest, RelationalOperator, Step,
};
pub use error::XPathError;
pub use parser::parse_expression;
