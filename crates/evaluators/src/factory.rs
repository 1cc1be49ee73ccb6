//! Builds evaluator trees from parsed predicate expressions.
use crate::comparison::{
    EqualsEvaluator, GreaterThanEvaluator, LessThanEvaluator, NotEqualsEvaluator, OperandPair,
};
use crate::error::EvaluatorError;
use crate::evaluator::Evaluator;
use crate::logical::{AndEvaluator, OrEvaluator};
use crate::name::Namespaces;
use crate::positional::IndexEvaluator;
use crate::step::SelectorStep;
use std::sync::Arc;
use xselect_xpath::{EqualityOperator, Expression, LogicalOperator, RelationalOperator};

/// Compiles the predicate `expr` of `step`.
///
/// Supported forms are `and`, `or`, `=`, `!=`, `<`, `>` and a bare number
/// (a position). Everything else fails with
/// [`EvaluatorError::UnsupportedExpression`]; no partial tree is returned.
pub fn build(
    expr: &Expression,
    step: &Arc<SelectorStep>,
    namespaces: &Namespaces,
) -> Result<Evaluator, EvaluatorError> {
    let evaluator = match expr {
        Expression::Logical { op, left, right } => {
            let left = build(left, step, namespaces)?;
            let right = build(right, step, namespaces)?;
            match op {
                LogicalOperator::And => Evaluator::And(AndEvaluator::new(left, right)),
                LogicalOperator::Or => Evaluator::Or(OrEvaluator::new(left, right)),
            }
        }
        Expression::Equality { op, left, right } => {
            let operands = OperandPair::new(expr, left, right, step, namespaces)?;
            match op {
                EqualityOperator::Equals => Evaluator::Equals(EqualsEvaluator::new(operands)),
                EqualityOperator::NotEquals => {
                    Evaluator::NotEquals(NotEqualsEvaluator::new(operands))
                }
            }
        }
        Expression::Relational { op, left, right } => match op {
            RelationalOperator::LessThan => Evaluator::LessThan(LessThanEvaluator::new(
                OperandPair::new(expr, left, right, step, namespaces)?,
            )),
            RelationalOperator::GreaterThan => Evaluator::GreaterThan(GreaterThanEvaluator::new(
                OperandPair::new(expr, left, right, step, namespaces)?,
            )),
            RelationalOperator::LessThanOrEqual | RelationalOperator::GreaterThanOrEqual => {
                return Err(EvaluatorError::unsupported(
                    expr,
                    format!("operator '{}' is not supported", op.as_str()),
                ));
            }
        },
        Expression::Number(n) => Evaluator::Index(IndexEvaluator::new(*n, Arc::clone(step))),
        Expression::Arithmetic { .. }
        | Expression::Negate(_)
        | Expression::Union { .. }
        | Expression::Literal(_)
        | Expression::Variable(_)
        | Expression::FunctionCall { .. }
        | Expression::Path(_) => return Err(unsupported_kind(expr)),
    };
    log::debug!("Built {} evaluator for [{}] on step '{}'", kind(&evaluator), expr, step);
    Ok(evaluator)
}

fn unsupported_kind(expr: &Expression) -> EvaluatorError {
    EvaluatorError::unsupported(
        expr,
        format!("{} expressions cannot be used as predicates", expr.kind()),
    )
}

fn kind(evaluator: &Evaluator) -> &'static str {
    match evaluator {
        Evaluator::And(_) => "and",
        Evaluator::Or(_) => "or",
        Evaluator::Equals(_) => "equals",
        Evaluator::NotEquals(_) => "not-equals",
        Evaluator::LessThan(_) => "less-than",
        Evaluator::GreaterThan(_) => "greater-than",
        Evaluator::Index(_) => "index",
    }
}
