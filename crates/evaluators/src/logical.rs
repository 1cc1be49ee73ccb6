//! `and` / `or` combinators.
use crate::context::{ElementContext, Evaluation, ScopedContext};
use crate::evaluator::Evaluator;
use crate::execution::ExecutionContext;

/// Short-circuits on a false left side. The right side starts from the context
/// the left side ended on.
#[derive(Debug, Clone, PartialEq)]
pub struct AndEvaluator {
    left: Box<Evaluator>,
    right: Box<Evaluator>,
}

impl AndEvaluator {
    pub fn new(left: Evaluator, right: Evaluator) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn left(&self) -> &Evaluator {
        &self.left
    }

    pub fn right(&self) -> &Evaluator {
        &self.right
    }

    pub fn evaluate<E: ElementContext>(
        &self,
        ctx: ScopedContext<E>,
        exec: &ExecutionContext,
    ) -> Evaluation<E> {
        let left = self.left.evaluate(ctx, exec);
        if !left.matched {
            return left;
        }
        self.right.evaluate(left.context, exec)
    }
}

/// Short-circuits on a true left side.
#[derive(Debug, Clone, PartialEq)]
pub struct OrEvaluator {
    left: Box<Evaluator>,
    right: Box<Evaluator>,
}

impl OrEvaluator {
    pub fn new(left: Evaluator, right: Evaluator) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn left(&self) -> &Evaluator {
        &self.left
    }

    pub fn right(&self) -> &Evaluator {
        &self.right
    }

    pub fn evaluate<E: ElementContext>(
        &self,
        ctx: ScopedContext<E>,
        exec: &ExecutionContext,
    ) -> Evaluation<E> {
        let left = self.left.evaluate(ctx, exec);
        if left.matched {
            return left;
        }
        self.right.evaluate(left.context, exec)
    }
}
