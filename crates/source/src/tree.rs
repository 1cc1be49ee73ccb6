// Materialized documents backed by roxmltree.
use crate::error::SourceError;
use roxmltree::{Node, ParsingOptions};
use std::borrow::Cow;
use xselect_evaluators::{ElementContext, NameTest, QualifiedName, TreeEvaluable};

/// Wrapper around `roxmltree::Document` exposing its elements to evaluators.
pub struct XmlDocument<'input> {
    doc: roxmltree::Document<'input>,
}

impl<'input> XmlDocument<'input> {
    pub fn parse(text: &'input str) -> Result<Self, SourceError> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)?;
        Ok(Self { doc })
    }

    pub fn root_element(&self) -> TreeElement<'_, 'input> {
        TreeElement::new(self.doc.root_element())
    }

    /// All elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = TreeElement<'_, 'input>> {
        self.doc
            .descendants()
            .filter(|n| n.is_element())
            .map(TreeElement::new)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TreeElement<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input> TreeElement<'a, 'input> {
    pub fn new(node: Node<'a, 'input>) -> Self {
        Self { node }
    }

    pub fn node(&self) -> Node<'a, 'input> {
        self.node
    }
}

impl PartialEq for TreeElement<'_, '_> {
    fn eq(&self, other: &Self) -> bool {
        self.node.id() == other.node.id()
    }
}

impl Eq for TreeElement<'_, '_> {}

impl ElementContext for TreeElement<'_, '_> {
    fn local_name(&self) -> &str {
        self.node.tag_name().name()
    }

    fn namespace_uri(&self) -> Option<&str> {
        self.node.tag_name().namespace()
    }

    fn attribute(&self, name: &QualifiedName) -> Option<&str> {
        self.node
            .attributes()
            .find(|a| name.matches(a.name(), a.namespace()))
            .map(|a| a.value())
    }

    fn text(&self) -> Cow<'_, str> {
        let mut texts = self
            .node
            .children()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text());
        match (texts.next(), texts.next()) {
            (None, _) => Cow::Borrowed(""),
            (Some(only), None) => Cow::Borrowed(only),
            (Some(first), Some(second)) => {
                let mut joined = format!("{}{}", first, second);
                texts.for_each(|t| joined.push_str(t));
                Cow::Owned(joined)
            }
        }
    }

    fn parent(&self) -> Option<Self> {
        self.node.parent_element().map(TreeElement::new)
    }

    fn position(&self, test: &NameTest) -> usize {
        if !test.matches(self.local_name(), self.namespace_uri()) {
            return 0;
        }
        let preceding = std::iter::successors(self.node.prev_sibling_element(), |n| {
            n.prev_sibling_element()
        })
        .filter(|n| test.matches(n.tag_name().name(), n.tag_name().namespace()))
        .count();
        preceding + 1
    }
}

impl TreeEvaluable for TreeElement<'_, '_> {}
