//! Operand resolution: turning one side of a comparison into a value.
use crate::context::{ElementContext, ancestor};
use crate::error::EvaluatorError;
use crate::name::{Namespaces, QualifiedName};
use std::borrow::Cow;
use xselect_xpath::ast::format_number;
use xselect_xpath::{Axis, Expression, NodeTest, NodeTypeTest, Step};

/// One side of a comparison, resolved against the element of the owning step.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(String),
    Number(f64),
    /// `@name`, optionally preceded by `up` parent steps (`../@name`).
    Attribute { name: QualifiedName, up: usize },
    /// `text()` or `.`, optionally preceded by `up` parent steps.
    Text { up: usize },
}

/// A resolved operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(f64),
}

impl Value {
    /// The numeric reading of the value, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => parse_number(s),
        }
    }

    pub fn as_string(&self) -> Cow<'_, str> {
        match self {
            Value::String(s) => Cow::Borrowed(s),
            Value::Number(n) => Cow::Owned(format_number(*n)),
        }
    }
}

/// Parses the XPath number syntax: optional minus, digits, optional fraction.
/// Unlike `f64::from_str` this rejects `inf`, `NaN` and exponents.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let mut digits = 0;
    let mut dots = 0;
    for c in unsigned.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    trimmed.parse().ok()
}

impl Operand {
    /// Builds an operand from one side of a comparison expression.
    pub fn from_expression(
        expr: &Expression,
        namespaces: &Namespaces,
    ) -> Result<Self, EvaluatorError> {
        match expr {
            Expression::Literal(s) => Ok(Operand::Literal(s.clone())),
            Expression::Number(n) => Ok(Operand::Number(*n)),
            Expression::Negate(inner) => match inner.as_ref() {
                Expression::Number(n) => Ok(Operand::Number(-n)),
                _ => Err(EvaluatorError::unsupported(
                    expr,
                    "only numeric literals can be negated",
                )),
            },
            Expression::Path(path) if !path.is_absolute => {
                path_operand(expr, &path.steps, namespaces)
            }
            Expression::Path(_) => Err(EvaluatorError::unsupported(
                expr,
                "absolute paths cannot be resolved against the context element",
            )),
            other => Err(EvaluatorError::unsupported(
                expr,
                format!("{} expressions are not supported as operands", other.kind()),
            )),
        }
    }

    pub fn is_numeric_literal(&self) -> bool {
        matches!(self, Operand::Number(_))
    }

    pub fn reads_text(&self) -> bool {
        matches!(self, Operand::Text { .. })
    }

    /// Resolves the operand against `element`, the element of the owning step.
    /// A missing element, ancestor or attribute resolves to the empty string.
    pub fn resolve<E: ElementContext>(&self, element: Option<&E>) -> Value {
        match self {
            Operand::Literal(s) => Value::String(s.clone()),
            Operand::Number(n) => Value::Number(*n),
            Operand::Attribute { name, up } => Value::String(
                element
                    .and_then(|e| ancestor(e, *up))
                    .and_then(|e| e.attribute(name).map(str::to_string))
                    .unwrap_or_default(),
            ),
            Operand::Text { up } => Value::String(
                element
                    .and_then(|e| ancestor(e, *up))
                    .map(|e| e.text().into_owned())
                    .unwrap_or_default(),
            ),
        }
    }
}

fn is_plain_step(step: &Step, axis: Axis) -> bool {
    step.axis == axis
        && step.predicates.is_empty()
        && matches!(
            step.node_test,
            NodeTest::NodeType(NodeTypeTest::Node) | NodeTest::Wildcard
        )
}

/// Accepts `(.|..)* (@name | text())?`.
fn path_operand(
    expr: &Expression,
    steps: &[Step],
    namespaces: &Namespaces,
) -> Result<Operand, EvaluatorError> {
    let mut up = 0;
    let mut rest = steps;
    while let Some((first, tail)) = rest.split_first() {
        if is_plain_step(first, Axis::Parent) {
            up += 1;
        } else if !is_plain_step(first, Axis::SelfAxis) {
            break;
        }
        rest = tail;
    }

    match rest {
        [] => Ok(Operand::Text { up }),
        [last] if !last.predicates.is_empty() => Err(EvaluatorError::unsupported(
            expr,
            "predicates inside operands are not supported",
        )),
        [last] => match (&last.axis, &last.node_test) {
            (Axis::Attribute, NodeTest::Name(raw)) => match namespaces.attribute_name(raw) {
                Some(name) => Ok(Operand::Attribute { name, up }),
                None => Err(EvaluatorError::unsupported(
                    expr,
                    format!("namespace prefix of '{}' is not bound", raw),
                )),
            },
            (Axis::Attribute, NodeTest::Wildcard) => Err(EvaluatorError::AmbiguousOperand {
                expression: expr.to_string(),
            }),
            (Axis::Child, NodeTest::NodeType(NodeTypeTest::Text)) => Ok(Operand::Text { up }),
            _ => Err(EvaluatorError::unsupported(
                expr,
                "only attributes and text() of the context element or its ancestors can be compared",
            )),
        },
        _ => Err(EvaluatorError::unsupported(
            expr,
            "multi-step paths into child elements cannot be evaluated while streaming",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::create_order_document;
    use xselect_xpath::parse_expression;

    fn operand(text: &str) -> Result<Operand, EvaluatorError> {
        let ns = Namespaces::new().with("ord", "urn:orders");
        Operand::from_expression(&parse_expression(text).unwrap(), &ns)
    }

    #[test]
    fn test_operand_kinds() {
        assert_eq!(operand("'x'").unwrap(), Operand::Literal("x".into()));
        assert_eq!(operand("4").unwrap(), Operand::Number(4.0));
        assert_eq!(operand("-4").unwrap(), Operand::Number(-4.0));
        assert_eq!(
            operand("@sku").unwrap(),
            Operand::Attribute {
                name: QualifiedName::new("sku"),
                up: 0
            }
        );
        assert_eq!(
            operand("../../@ord:id").unwrap(),
            Operand::Attribute {
                name: QualifiedName::with_namespace("urn:orders", "id"),
                up: 2
            }
        );
        assert_eq!(operand("text()").unwrap(), Operand::Text { up: 0 });
        assert_eq!(operand(".").unwrap(), Operand::Text { up: 0 });
        assert_eq!(operand("../text()").unwrap(), Operand::Text { up: 1 });
        assert_eq!(operand("..").unwrap(), Operand::Text { up: 1 });
    }

    #[test]
    fn test_rejected_operands() {
        assert!(matches!(
            operand("@*"),
            Err(EvaluatorError::AmbiguousOperand { .. })
        ));
        assert!(matches!(
            operand("@x:id"),
            Err(EvaluatorError::UnsupportedExpression { .. })
        ));
        assert!(matches!(
            operand("name"),
            Err(EvaluatorError::UnsupportedExpression { .. })
        ));
        assert!(matches!(
            operand("/order/@id"),
            Err(EvaluatorError::UnsupportedExpression { .. })
        ));
        assert!(matches!(
            operand("string-length(@sku)"),
            Err(EvaluatorError::UnsupportedExpression { .. })
        ));
    }

    #[test]
    fn test_resolve_against_element() {
        let doc = create_order_document();
        let item = doc.element(2);
        let sku = operand("@sku").unwrap();
        let status = operand("../@status").unwrap();
        let missing = operand("@missing").unwrap();
        let too_high = operand("../../@status").unwrap();

        assert_eq!(sku.resolve(Some(&item)), Value::String("A1".into()));
        assert_eq!(status.resolve(Some(&item)), Value::String("open".into()));
        assert_eq!(missing.resolve(Some(&item)), Value::String(String::new()));
        assert_eq!(too_high.resolve(Some(&item)), Value::String(String::new()));
        assert_eq!(
            operand("text()").unwrap().resolve(Some(&item)),
            Value::String("Pen".into())
        );
        assert_eq!(sku.resolve::<crate::testing::MockElement<'_>>(None), Value::String(String::new()));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("10"), Some(10.0));
        assert_eq!(parse_number(" 9.50 "), Some(9.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("1e3"), None);
        assert_eq!(parse_number("1.2.3"), None);
        assert_eq!(parse_number("-"), None);
    }

    #[test]
    fn test_value_string_forms() {
        assert_eq!(Value::Number(2.0).as_string(), "2");
        assert_eq!(Value::String("abc".into()).as_number(), None);
    }
}
