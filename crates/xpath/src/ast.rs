//! Defines the Abstract Syntax Tree (AST) for selector expressions.
//!
//! The node kinds mirror the XPath 1.0 grammar closely enough that every parsed
//! expression can be rendered back to text (see the `Display` impls), which is
//! what diagnostics quote when an expression is rejected downstream.

use std::fmt;

/// A parsed expression. Operator nodes are split by grammar level so consumers
/// can dispatch on the node kind before looking at the operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Logical {
        op: LogicalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Equality {
        op: EqualityOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Relational {
        op: RelationalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Arithmetic {
        op: ArithmeticOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Union {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Negate(Box<Expression>),
    Number(f64),
    Literal(String),
    Variable(String),
    FunctionCall {
        name: String,
        args: Vec<Expression>,
    },
    Path(LocationPath),
}

impl Expression {
    /// Checks if the expression is a `Path` variant.
    pub fn is_location_path(&self) -> bool {
        matches!(self, Expression::Path(_))
    }

    /// Short, human readable name of the node kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Logical { .. } => "logical",
            Expression::Equality { .. } => "equality",
            Expression::Relational { .. } => "relational",
            Expression::Arithmetic { .. } => "arithmetic",
            Expression::Union { .. } => "union",
            Expression::Negate(_) => "negation",
            Expression::Number(_) => "number",
            Expression::Literal(_) => "literal",
            Expression::Variable(_) => "variable",
            Expression::FunctionCall { .. } => "function call",
            Expression::Path(_) => "location path",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityOperator {
    Equals,
    NotEquals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalOperator {
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }
}

impl EqualityOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            EqualityOperator::Equals => "=",
            EqualityOperator::NotEquals => "!=",
        }
    }
}

impl RelationalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationalOperator::LessThan => "<",
            RelationalOperator::LessThanOrEqual => "<=",
            RelationalOperator::GreaterThan => ">",
            RelationalOperator::GreaterThanOrEqual => ">=",
        }
    }
}

impl ArithmeticOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArithmeticOperator::Plus => "+",
            ArithmeticOperator::Minus => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "div",
            ArithmeticOperator::Modulo => "mod",
        }
    }
}

/// Represents a full location path, like `/order/item`, `@id` or `../@type`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPath {
    /// True if the path starts from the document root (e.g., `/foo`).
    pub is_absolute: bool,
    pub steps: Vec<Step>,
}

/// Represents a single step in a location path, like `child::item[2]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub node_test: NodeTest,
    pub predicates: Vec<Expression>,
}

impl Step {
    /// The abbreviated `..` step.
    pub fn parent() -> Self {
        Step {
            axis: Axis::Parent,
            node_test: NodeTest::NodeType(NodeTypeTest::Node),
            predicates: vec![],
        }
    }

    /// The abbreviated `.` step.
    pub fn context() -> Self {
        Step {
            axis: Axis::SelfAxis,
            node_test: NodeTest::NodeType(NodeTypeTest::Node),
            predicates: vec![],
        }
    }

    /// The implicit step inserted for `//`.
    pub fn descendant_or_self() -> Self {
        Step {
            axis: Axis::DescendantOrSelf,
            node_test: NodeTest::NodeType(NodeTypeTest::Node),
            predicates: vec![],
        }
    }
}

/// The axis of movement from the context node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Attribute,
    Parent,
    Ancestor,
    AncestorOrSelf,
    SelfAxis,
    FollowingSibling,
    PrecedingSibling,
    Following,
    Preceding,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Child => "child",
            Axis::Descendant => "descendant",
            Axis::DescendantOrSelf => "descendant-or-self",
            Axis::Attribute => "attribute",
            Axis::Parent => "parent",
            Axis::Ancestor => "ancestor",
            Axis::AncestorOrSelf => "ancestor-or-self",
            Axis::SelfAxis => "self",
            Axis::FollowingSibling => "following-sibling",
            Axis::PrecedingSibling => "preceding-sibling",
            Axis::Following => "following",
            Axis::Preceding => "preceding",
        }
    }
}

/// A test to apply to nodes on a given axis to see if they should be included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// A qualified name test (e.g., `item`, `ord:item`).
    Name(String),
    /// A wildcard test (`*`).
    Wildcard,
    /// A node type test (e.g., `text()`, `node()`).
    NodeType(NodeTypeTest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTypeTest {
    Text,
    Node,
    Comment,
    ProcessingInstruction,
}

// --- Rendering back to XPath text ---

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Logical { op, left, right } => {
                write!(f, "{} {} {}", left, op.as_str(), right)
            }
            Expression::Equality { op, left, right } => {
                write!(f, "{} {} {}", left, op.as_str(), right)
            }
            Expression::Relational { op, left, right } => {
                write!(f, "{} {} {}", left, op.as_str(), right)
            }
            Expression::Arithmetic { op, left, right } => {
                write!(f, "{} {} {}", left, op.as_str(), right)
            }
            Expression::Union { left, right } => write!(f, "{} | {}", left, right),
            Expression::Negate(expr) => write!(f, "-{}", expr),
            Expression::Number(n) => write!(f, "{}", format_number(*n)),
            Expression::Literal(s) => {
                if s.contains('\'') {
                    write!(f, "\"{}\"", s)
                } else {
                    write!(f, "'{}'", s)
                }
            }
            Expression::Variable(name) => write!(f, "${}", name),
            Expression::FunctionCall { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expression::Path(path) => write!(f, "{}", path),
        }
    }
}

impl fmt::Display for LocationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absolute {
            write!(f, "/")?;
        }
        let mut first = true;
        for step in &self.steps {
            if step.axis == Axis::DescendantOrSelf
                && step.node_test == NodeTest::NodeType(NodeTypeTest::Node)
                && step.predicates.is_empty()
            {
                // Rendered as the `//` separator in front of the next step.
                write!(f, "{}", if first && self.is_absolute { "/" } else { "//" })?;
                first = true;
                continue;
            }
            if !first {
                write!(f, "/")?;
            }
            write!(f, "{}", step)?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let is_node = self.node_test == NodeTest::NodeType(NodeTypeTest::Node);
        match self.axis {
            Axis::Parent if is_node => write!(f, "..")?,
            Axis::SelfAxis if is_node => write!(f, ".")?,
            Axis::Child => write!(f, "{}", self.node_test)?,
            Axis::Attribute => write!(f, "@{}", self.node_test)?,
            other => write!(f, "{}::{}", other.as_str(), self.node_test)?,
        }
        for predicate in &self.predicates {
            write!(f, "[{}]", predicate)?;
        }
        Ok(())
    }
}

impl fmt::Display for NodeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeTest::Name(name) => write!(f, "{}", name),
            NodeTest::Wildcard => write!(f, "*"),
            NodeTest::NodeType(NodeTypeTest::Text) => write!(f, "text()"),
            NodeTest::NodeType(NodeTypeTest::Node) => write!(f, "node()"),
            NodeTest::NodeType(NodeTypeTest::Comment) => write!(f, "comment()"),
            NodeTest::NodeType(NodeTypeTest::ProcessingInstruction) => {
                write!(f, "processing-instruction()")
            }
        }
    }
}

/// Formats a number the way XPath's `string()` does for the common cases:
/// integral values lose their fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_step(name: &str) -> Step {
        Step {
            axis: Axis::Child,
            node_test: NodeTest::Name(name.to_string()),
            predicates: vec![],
        }
    }

    #[test]
    fn test_display_comparison() {
        let expr = Expression::Equality {
            op: EqualityOperator::NotEquals,
            left: Box::new(Expression::Path(LocationPath {
                is_absolute: false,
                steps: vec![Step {
                    axis: Axis::Attribute,
                    node_test: NodeTest::Name("type".into()),
                    predicates: vec![],
                }],
            })),
            right: Box::new(Expression::Literal("book".into())),
        };
        assert_eq!(expr.to_string(), "@type != 'book'");
    }

    #[test]
    fn test_display_literal_quoting() {
        assert_eq!(Expression::Literal("it's".into()).to_string(), "\"it's\"");
        assert_eq!(Expression::Number(2.0).to_string(), "2");
        assert_eq!(Expression::Number(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_display_paths() {
        let path = LocationPath {
            is_absolute: true,
            steps: vec![name_step("order"), name_step("item")],
        };
        assert_eq!(path.to_string(), "/order/item");

        let parent_attr = LocationPath {
            is_absolute: false,
            steps: vec![
                Step::parent(),
                Step {
                    axis: Axis::Attribute,
                    node_test: NodeTest::Name("id".into()),
                    predicates: vec![],
                },
            ],
        };
        assert_eq!(parent_attr.to_string(), "../@id");

        let anywhere = LocationPath {
            is_absolute: true,
            steps: vec![Step::descendant_or_self(), name_step("item")],
        };
        assert_eq!(anywhere.to_string(), "//item");
    }

    #[test]
    fn test_display_function_call() {
        let expr = Expression::FunctionCall {
            name: "contains".into(),
            args: vec![
                Expression::Path(LocationPath {
                    is_absolute: false,
                    steps: vec![Step {
                        axis: Axis::Child,
                        node_test: NodeTest::NodeType(NodeTypeTest::Text),
                        predicates: vec![],
                    }],
                }),
                Expression::Literal("x".into()),
            ],
        };
        assert_eq!(expr.to_string(), "contains(text(), 'x')");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(f64::NAN), "NaN");
    }
}
