//! `=`, `!=`, `<` and `>` evaluators.
use crate::context::{ElementContext, Evaluation, ScopedContext};
use crate::error::EvaluatorError;
use crate::execution::ExecutionContext;
use crate::name::Namespaces;
use crate::operand::{Operand, Value};
use crate::step::SelectorStep;
use std::cmp::Ordering;
use xselect_xpath::Expression;

/// The two operands of a comparison, bound to the level of the owning step.
#[derive(Debug, Clone, PartialEq)]
pub struct OperandPair {
    left: Operand,
    right: Operand,
    level: usize,
    text: String,
}

impl OperandPair {
    pub fn new(
        expr: &Expression,
        left: &Expression,
        right: &Expression,
        step: &SelectorStep,
        namespaces: &Namespaces,
    ) -> Result<Self, EvaluatorError> {
        let left = Operand::from_expression(left, namespaces)?;
        let right = Operand::from_expression(right, namespaces)?;
        // A streamed ancestor's text is incomplete while its descendants are read.
        for operand in [&left, &right] {
            if let Operand::Text { up } = operand
                && step.level() + up > 0
            {
                return Err(EvaluatorError::unsupported(
                    expr,
                    "only the selected element's own text can be compared",
                ));
            }
        }
        Ok(Self {
            left,
            right,
            level: step.level(),
            text: expr.to_string(),
        })
    }

    pub fn left(&self) -> &Operand {
        &self.left
    }

    pub fn right(&self) -> &Operand {
        &self.right
    }

    /// The expression text, for diagnostics.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn reads_text(&self) -> bool {
        self.left.reads_text() || self.right.reads_text()
    }

    /// Moves the context to the step's element and resolves both sides there.
    fn resolve<E: ElementContext>(&self, ctx: ScopedContext<E>) -> (Value, Value, ScopedContext<E>) {
        let scoped = ctx.at_level(self.level);
        let left = self.left.resolve(scoped.current());
        let right = self.right.resolve(scoped.current());
        (left, right, scoped)
    }
}

/// Equality with numeric promotion: when either side is a number, the other
/// side is compared numerically if it reads as one, otherwise both are compared
/// as strings.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Number(n), other) | (other, Value::Number(n)) => match other.as_number() {
            Some(m) => *n == m,
            None => other.as_string() == Value::Number(*n).as_string(),
        },
        (Value::String(a), Value::String(b)) => a == b,
    }
}

/// Ordering for `<` and `>`: numeric when both sides read as numbers, lexical
/// otherwise. `None` only for NaN.
fn compare_values(
    left: &Value,
    right: &Value,
    text: &str,
    exec: &ExecutionContext,
) -> Option<Ordering> {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => {
            log::trace!(
                "'{}': comparing '{}' and '{}' lexically",
                text,
                left.as_string(),
                right.as_string()
            );
            exec.warn(format!(
                "Non-numeric operands in '{}' were compared lexically",
                text
            ));
            Some(left.as_string().cmp(&right.as_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EqualsEvaluator {
    operands: OperandPair,
}

impl EqualsEvaluator {
    pub fn new(operands: OperandPair) -> Self {
        Self { operands }
    }

    pub fn operands(&self) -> &OperandPair {
        &self.operands
    }

    pub fn evaluate<E: ElementContext>(
        &self,
        ctx: ScopedContext<E>,
        _exec: &ExecutionContext,
    ) -> Evaluation<E> {
        let (left, right, scoped) = self.operands.resolve(ctx);
        Evaluation::new(values_equal(&left, &right), scoped)
    }
}

/// `!=`, defined as the negation of `=` over the same operands.
#[derive(Debug, Clone, PartialEq)]
pub struct NotEqualsEvaluator {
    equals: EqualsEvaluator,
}

impl NotEqualsEvaluator {
    pub fn new(operands: OperandPair) -> Self {
        Self {
            equals: EqualsEvaluator::new(operands),
        }
    }

    pub fn operands(&self) -> &OperandPair {
        self.equals.operands()
    }

    pub fn evaluate<E: ElementContext>(
        &self,
        ctx: ScopedContext<E>,
        exec: &ExecutionContext,
    ) -> Evaluation<E> {
        let equals = self.equals.evaluate(ctx, exec);
        Evaluation::new(!equals.matched, equals.context)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LessThanEvaluator {
    operands: OperandPair,
}

impl LessThanEvaluator {
    pub fn new(operands: OperandPair) -> Self {
        Self { operands }
    }

    pub fn operands(&self) -> &OperandPair {
        &self.operands
    }

    pub fn evaluate<E: ElementContext>(
        &self,
        ctx: ScopedContext<E>,
        exec: &ExecutionContext,
    ) -> Evaluation<E> {
        let (left, right, scoped) = self.operands.resolve(ctx);
        let ordering = compare_values(&left, &right, &self.operands.text, exec);
        Evaluation::new(ordering == Some(Ordering::Less), scoped)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GreaterThanEvaluator {
    operands: OperandPair,
}

impl GreaterThanEvaluator {
    pub fn new(operands: OperandPair) -> Self {
        Self { operands }
    }

    pub fn operands(&self) -> &OperandPair {
        &self.operands
    }

    pub fn evaluate<E: ElementContext>(
        &self,
        ctx: ScopedContext<E>,
        exec: &ExecutionContext,
    ) -> Evaluation<E> {
        let (left, right, scoped) = self.operands.resolve(ctx);
        let ordering = compare_values(&left, &right, &self.operands.text, exec);
        Evaluation::new(ordering == Some(Ordering::Greater), scoped)
    }
}
