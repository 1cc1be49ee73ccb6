//! An in-memory element tree for exercising evaluators without an XML parser.
//!
//! Every attribute lookup is recorded, which lets tests observe whether an
//! evaluator touched its operands at all.
use crate::context::{ElementContext, StreamEvaluable, TreeEvaluable};
use crate::name::{NameTest, QualifiedName};
use std::borrow::Cow;
use std::cell::RefCell;

#[derive(Debug, Clone, Default)]
struct MockNode {
    local_name: String,
    namespace: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
    attributes: Vec<(QualifiedName, String)>,
    text: String,
}

#[derive(Debug, Default)]
pub struct MockDocument {
    nodes: Vec<MockNode>,
    reads: RefCell<Vec<String>>,
}

impl MockDocument {
    /// Creates a document whose root element (id 0) is named `root`.
    pub fn new(root: &str) -> Self {
        Self {
            nodes: vec![MockNode {
                local_name: root.to_string(),
                ..MockNode::default()
            }],
            reads: RefCell::default(),
        }
    }

    /// Appends a child element to `parent` and returns its id.
    pub fn add_element(&mut self, parent: usize, name: &str) -> usize {
        let id = self.nodes.len();
        self.nodes.push(MockNode {
            local_name: name.to_string(),
            parent: Some(parent),
            ..MockNode::default()
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn set_attribute(&mut self, id: usize, name: &str, value: &str) {
        self.nodes[id]
            .attributes
            .push((QualifiedName::new(name), value.to_string()));
    }

    pub fn set_ns_attribute(&mut self, id: usize, namespace: &str, name: &str, value: &str) {
        self.nodes[id]
            .attributes
            .push((QualifiedName::with_namespace(namespace, name), value.to_string()));
    }

    pub fn set_text(&mut self, id: usize, text: &str) {
        self.nodes[id].text = text.to_string();
    }

    pub fn set_namespace(&mut self, id: usize, namespace: &str) {
        self.nodes[id].namespace = Some(namespace.to_string());
    }

    pub fn element(&self, id: usize) -> MockElement<'_> {
        MockElement { doc: self, id }
    }

    pub fn element_ids(&self) -> std::ops::Range<usize> {
        0..self.nodes.len()
    }

    /// Attribute names looked up so far, in order.
    pub fn attribute_reads(&self) -> Vec<String> {
        self.reads.borrow().clone()
    }

    pub fn clear_reads(&self) {
        self.reads.borrow_mut().clear();
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MockElement<'d> {
    doc: &'d MockDocument,
    id: usize,
}

impl<'d> MockElement<'d> {
    pub fn id(&self) -> usize {
        self.id
    }

    fn node(&self) -> &'d MockNode {
        &self.doc.nodes[self.id]
    }
}

impl ElementContext for MockElement<'_> {
    fn local_name(&self) -> &str {
        &self.node().local_name
    }

    fn namespace_uri(&self) -> Option<&str> {
        self.node().namespace.as_deref()
    }

    fn attribute(&self, name: &QualifiedName) -> Option<&str> {
        self.doc.reads.borrow_mut().push(name.to_string());
        self.node()
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.node().text)
    }

    fn parent(&self) -> Option<Self> {
        self.node().parent.map(|id| MockElement { doc: self.doc, id })
    }

    fn position(&self, test: &NameTest) -> usize {
        let node = self.node();
        if !test.matches(&node.local_name, node.namespace.as_deref()) {
            return 0;
        }
        let Some(parent) = node.parent else {
            return 1;
        };
        self.doc.nodes[parent]
            .children
            .iter()
            .take_while(|&&id| id != self.id)
            .filter(|&&id| {
                let sibling = &self.doc.nodes[id];
                test.matches(&sibling.local_name, sibling.namespace.as_deref())
            })
            .count()
            + 1
    }
}

impl TreeEvaluable for MockElement<'_> {}
impl StreamEvaluable for MockElement<'_> {}

/// ```text
/// 0 <order id="o1" status="open">
/// 1   <customer tier="gold">Alice</customer>
/// 2   <item sku="A1" qty="2" price="9.50">Pen</item>
/// 3   <item sku="B2" qty="10" price="120">Lamp</item>
/// 4   <note>fragile</note>
/// 5   <item sku="C3" qty="1">Mug</item>
///   </order>
/// ```
pub fn create_order_document() -> MockDocument {
    let mut doc = MockDocument::new("order");
    doc.set_attribute(0, "id", "o1");
    doc.set_attribute(0, "status", "open");

    let customer = doc.add_element(0, "customer");
    doc.set_attribute(customer, "tier", "gold");
    doc.set_text(customer, "Alice");

    for (sku, qty, price, text) in [
        ("A1", "2", Some("9.50"), "Pen"),
        ("B2", "10", Some("120"), "Lamp"),
    ] {
        let item = doc.add_element(0, "item");
        doc.set_attribute(item, "sku", sku);
        doc.set_attribute(item, "qty", qty);
        if let Some(price) = price {
            doc.set_attribute(item, "price", price);
        }
        doc.set_text(item, text);
    }

    let note = doc.add_element(0, "note");
    doc.set_text(note, "fragile");

    let item = doc.add_element(0, "item");
    doc.set_attribute(item, "sku", "C3");
    doc.set_attribute(item, "qty", "1");
    doc.set_text(item, "Mug");
    doc
}
