use crate::context::{ElementContext, Evaluation, ScopedContext};
use crate::execution::ExecutionContext;
use crate::step::SelectorStep;
use std::sync::Arc;

/// `[n]`: matches the n-th element satisfying the owning step's name test among
/// its siblings, counting in document order.
///
/// The ordinal comes from [`ElementContext::position`]. Streamed elements
/// answer it from the per-parent counters kept while reading, so only
/// siblings already seen are counted.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEvaluator {
    index: usize,
    step: Arc<SelectorStep>,
}

impl IndexEvaluator {
    /// Fractional literals are truncated toward zero (`[2.5]` is `[2]`);
    /// anything below 1 never matches.
    pub fn new(value: f64, step: Arc<SelectorStep>) -> Self {
        let index = if value >= 1.0 && value <= usize::MAX as f64 {
            value.trunc() as usize
        } else {
            log::warn!(
                "Position predicate [{}] on step '{}' can never match",
                value,
                step
            );
            0
        };
        Self { index, step }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn step(&self) -> &SelectorStep {
        &self.step
    }

    pub fn evaluate<E: ElementContext>(
        &self,
        ctx: ScopedContext<E>,
        _exec: &ExecutionContext,
    ) -> Evaluation<E> {
        let scoped = ctx.at_level(self.step.level());
        let matched = self.index > 0
            && scoped
                .current()
                .is_some_and(|e| e.position(self.step.name()) == self.index);
        Evaluation::new(matched, scoped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::NameTest;
    use crate::testing::create_order_document;

    fn index(value: f64, name: &str, level: usize) -> IndexEvaluator {
        let test = match name {
            "*" => NameTest::Any,
            local => NameTest::Local(local.into()),
        };
        IndexEvaluator::new(value, Arc::new(SelectorStep::new(test, level)))
    }

    fn matching(evaluator: &IndexEvaluator) -> Vec<usize> {
        let doc = create_order_document();
        let exec = ExecutionContext::new();
        doc.element_ids()
            .filter(|&id| {
                evaluator
                    .evaluate(ScopedContext::new(doc.element(id)), &exec)
                    .matched
            })
            .collect()
    }

    #[test]
    fn test_first_matches_only_first_in_scope() {
        assert_eq!(matching(&index(1.0, "item", 0)), vec![2]);
        assert_eq!(matching(&index(3.0, "item", 0)), vec![5]);
    }

    #[test]
    fn test_index_beyond_count_matches_nothing() {
        assert!(matching(&index(4.0, "item", 0)).is_empty());
    }

    #[test]
    fn test_position_counts_only_the_step_name() {
        // note is the 4th child, but the 1st note.
        assert_eq!(matching(&index(1.0, "note", 0)), vec![4]);
        assert_eq!(matching(&index(4.0, "*", 0)), vec![4]);
    }

    #[test]
    fn test_fractional_index_truncates() {
        assert_eq!(index(2.5, "item", 0).index(), 2);
        assert_eq!(matching(&index(2.5, "item", 0)), vec![3]);
        assert_eq!(matching(&index(1.99, "item", 0)), vec![2]);
    }

    #[test]
    fn test_indexes_below_one_never_match() {
        assert_eq!(index(0.0, "item", 0).index(), 0);
        assert_eq!(index(0.5, "item", 0).index(), 0);
        assert_eq!(index(-1.0, "item", 0).index(), 0);
        assert!(matching(&index(0.5, "item", 0)).is_empty());
    }

    #[test]
    fn test_index_on_ancestor_step() {
        // order[1]/item: every child of the first order.
        let matched = matching(&index(1.0, "order", 1));
        assert_eq!(matched, vec![1, 2, 3, 4, 5]);
    }
}
