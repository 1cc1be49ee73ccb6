use crate::comparison::{
    EqualsEvaluator, GreaterThanEvaluator, LessThanEvaluator, NotEqualsEvaluator,
};
use crate::context::{
    ElementContext, Evaluation, ScopedContext, StreamEvaluable, TreeEvaluable,
};
use crate::execution::ExecutionContext;
use crate::logical::{AndEvaluator, OrEvaluator};
use crate::positional::IndexEvaluator;

/// A node of a compiled predicate.
///
/// Trees are immutable once built and hold no per-element state, so one tree
/// can be shared across threads and documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluator {
    And(AndEvaluator),
    Or(OrEvaluator),
    Equals(EqualsEvaluator),
    NotEquals(NotEqualsEvaluator),
    LessThan(LessThanEvaluator),
    GreaterThan(GreaterThanEvaluator),
    Index(IndexEvaluator),
}

impl Evaluator {
    /// Evaluates against a scoped context and returns the context the
    /// evaluation ended on.
    pub fn evaluate<E: ElementContext>(
        &self,
        ctx: ScopedContext<E>,
        exec: &ExecutionContext,
    ) -> Evaluation<E> {
        match self {
            Evaluator::And(e) => e.evaluate(ctx, exec),
            Evaluator::Or(e) => e.evaluate(ctx, exec),
            Evaluator::Equals(e) => e.evaluate(ctx, exec),
            Evaluator::NotEquals(e) => e.evaluate(ctx, exec),
            Evaluator::LessThan(e) => e.evaluate(ctx, exec),
            Evaluator::GreaterThan(e) => e.evaluate(ctx, exec),
            Evaluator::Index(e) => e.evaluate(ctx, exec),
        }
    }

    /// Evaluates with `element` as the target, in a materialized document.
    pub fn evaluate_tree<E: TreeEvaluable>(&self, element: E, exec: &ExecutionContext) -> bool {
        self.evaluate(ScopedContext::new(element), exec).matched
    }

    /// Evaluates with `element` as the target, while streaming.
    pub fn evaluate_stream<E: StreamEvaluable>(
        &self,
        element: E,
        exec: &ExecutionContext,
    ) -> bool {
        self.evaluate(ScopedContext::new(element), exec).matched
    }

    /// Whether any comparison in the tree reads element text. Text is only
    /// complete once an element has been closed.
    pub fn reads_text(&self) -> bool {
        match self {
            Evaluator::And(e) => e.left().reads_text() || e.right().reads_text(),
            Evaluator::Or(e) => e.left().reads_text() || e.right().reads_text(),
            Evaluator::Equals(e) => e.operands().reads_text(),
            Evaluator::NotEquals(e) => e.operands().reads_text(),
            Evaluator::LessThan(e) => e.operands().reads_text(),
            Evaluator::GreaterThan(e) => e.operands().reads_text(),
            Evaluator::Index(_) => false,
        }
    }
}
