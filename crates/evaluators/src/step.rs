use crate::context::ElementContext;
use crate::name::NameTest;
use std::fmt;

/// One step of a selector, as seen by the evaluators built for its predicates.
///
/// `level` is the step's distance from the selector's target element: the last
/// step of `order/item` has level 0 and `order` has level 1. Evaluators for a
/// step resolve their operands against the ancestor at that level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorStep {
    name: NameTest,
    level: usize,
}

impl SelectorStep {
    pub fn new(name: NameTest, level: usize) -> Self {
        Self { name, level }
    }

    /// A step that targets the element being matched.
    pub fn target(name: NameTest) -> Self {
        Self::new(name, 0)
    }

    pub fn name(&self) -> &NameTest {
        &self.name
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn matches_element<E: ElementContext>(&self, element: &E) -> bool {
        self.name
            .matches(element.local_name(), element.namespace_uri())
    }
}

impl fmt::Display for SelectorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::create_order_document;

    #[test]
    fn test_matches_element_by_name() {
        let doc = create_order_document();
        let step = SelectorStep::target(NameTest::Local("item".into()));
        assert!(step.matches_element(&doc.element(2)));
        assert!(!step.matches_element(&doc.element(1)));
        assert!(SelectorStep::target(NameTest::Any).matches_element(&doc.element(1)));
    }

    #[test]
    fn test_level() {
        let step = SelectorStep::new(NameTest::Local("order".into()), 1);
        assert_eq!(step.level(), 1);
        assert_eq!(step.to_string(), "order");
    }
}
