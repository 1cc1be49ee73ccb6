//! The element abstraction evaluators run against, and the scoped context that
//! carries the "current" element through one evaluation.
use crate::name::{NameTest, QualifiedName};
use std::borrow::Cow;

/// Read access to an element and its ancestor chain.
///
/// Implemented by materialized tree nodes and by streamed elements. The methods
/// only ask for what a streaming parser can provide at the moment an element is
/// visited: its own name, attributes and text, its open ancestors, and its
/// ordinal among the siblings seen so far.
pub trait ElementContext: Clone {
    fn local_name(&self) -> &str;

    fn namespace_uri(&self) -> Option<&str>;

    /// The value of an attribute, or `None` when the element does not carry it.
    fn attribute(&self, name: &QualifiedName) -> Option<&str>;

    /// The concatenated text directly contained by the element.
    fn text(&self) -> Cow<'_, str>;

    /// The parent element, or `None` at the document element.
    fn parent(&self) -> Option<Self>;

    /// 1-based ordinal of this element among its preceding siblings (and itself)
    /// that satisfy `test`, in document order. Returns 0 if the element itself
    /// does not satisfy `test`.
    fn position(&self, test: &NameTest) -> usize;
}

/// An element of a fully built document: siblings and descendants exist.
pub trait TreeEvaluable: ElementContext {}

/// An element of a document being streamed: only the open ancestors exist.
pub trait StreamEvaluable: ElementContext {}

/// Walks `levels` parents up from `element`.
pub fn ancestor<E: ElementContext>(element: &E, levels: usize) -> Option<E> {
    let mut current = element.clone();
    for _ in 0..levels {
        current = current.parent()?;
    }
    Some(current)
}

/// The element an evaluation started from, plus the ancestor it is currently
/// positioned on.
///
/// Evaluators receive a `ScopedContext` by value and hand back the one they
/// ended on inside an [`Evaluation`]. Ancestors are always located relative to
/// the original target, so the result of moving to a level does not depend on
/// where earlier evaluators left the context.
#[derive(Debug, Clone)]
pub struct ScopedContext<E> {
    target: E,
    current: Option<E>,
    level: usize,
}

impl<E: ElementContext> ScopedContext<E> {
    pub fn new(target: E) -> Self {
        Self {
            current: Some(target.clone()),
            target,
            level: 0,
        }
    }

    pub fn target(&self) -> &E {
        &self.target
    }

    /// The element at the current level; `None` when the ancestor chain is
    /// shorter than the level.
    pub fn current(&self) -> Option<&E> {
        self.current.as_ref()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Repositions the context on the ancestor `level` steps above the target.
    pub fn at_level(&self, level: usize) -> Self {
        if level == self.level {
            return self.clone();
        }
        let current = if level > self.level {
            self.current
                .as_ref()
                .and_then(|c| ancestor(c, level - self.level))
        } else {
            ancestor(&self.target, level)
        };
        Self {
            target: self.target.clone(),
            current,
            level,
        }
    }
}

/// The outcome of evaluating one evaluator node.
#[derive(Debug, Clone)]
pub struct Evaluation<E> {
    pub matched: bool,
    pub context: ScopedContext<E>,
}

impl<E> Evaluation<E> {
    pub fn new(matched: bool, context: ScopedContext<E>) -> Self {
        Self { matched, context }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::create_order_document;

    #[test]
    fn test_ancestor_walk() {
        let doc = create_order_document();
        let item = doc.element(2);
        assert_eq!(ancestor(&item, 0).unwrap().local_name(), "item");
        assert_eq!(ancestor(&item, 1).unwrap().local_name(), "order");
        assert!(ancestor(&item, 2).is_none());
    }

    #[test]
    fn test_scoped_context_moves_up_and_back() {
        let doc = create_order_document();
        let ctx = ScopedContext::new(doc.element(2));
        assert_eq!(ctx.current().unwrap().local_name(), "item");

        let up = ctx.at_level(1);
        assert_eq!(up.level(), 1);
        assert_eq!(up.current().unwrap().local_name(), "order");
        assert_eq!(up.target().local_name(), "item");

        // Going back down re-walks from the target.
        let down = up.at_level(0);
        assert_eq!(down.current().unwrap().local_name(), "item");
    }

    #[test]
    fn test_scoped_context_beyond_root_is_absent() {
        let doc = create_order_document();
        let ctx = ScopedContext::new(doc.element(2)).at_level(5);
        assert!(ctx.current().is_none());
        assert_eq!(ctx.at_level(1).current().unwrap().local_name(), "order");
    }
}
