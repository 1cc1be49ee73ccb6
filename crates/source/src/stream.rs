//! Open-element bookkeeping for a single pass over a document.
//!
//! A [`StreamedContext`] holds only the chain of currently open elements. Each
//! open element keeps its resolved name, its attributes, the namespace
//! declarations it introduced, the direct text read so far, and counters for
//! the children started under it. Those counters are what positional
//! predicates read: an element's position is fixed when it starts, from the
//! siblings seen before it.
use crate::error::SourceError;
use std::borrow::Cow;
use std::collections::HashMap;
use xselect_evaluators::{
    ElementContext, NameTest, QualifiedName, StreamEvaluable, XML_NAMESPACE,
};

#[derive(Debug, Clone, Default)]
struct SiblingCounters {
    total: usize,
    by_local: HashMap<String, usize>,
    by_expanded: HashMap<(Option<String>, String), usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Positions {
    any: usize,
    local: usize,
    expanded: usize,
}

impl SiblingCounters {
    fn next(&mut self, local_name: &str, namespace: Option<&str>) -> Positions {
        self.total += 1;
        let local = self.by_local.entry(local_name.to_string()).or_default();
        *local += 1;
        let expanded = self
            .by_expanded
            .entry((namespace.map(str::to_string), local_name.to_string()))
            .or_default();
        *expanded += 1;
        Positions {
            any: self.total,
            local: *local,
            expanded: *expanded,
        }
    }
}

/// A `xmlns` or `xmlns:prefix` declaration. An empty URI undeclares the
/// default namespace.
#[derive(Debug, Clone)]
struct Declaration {
    prefix: Option<String>,
    uri: String,
}

#[derive(Debug, Clone)]
pub struct OpenElement {
    local_name: String,
    namespace: Option<String>,
    attributes: Vec<(QualifiedName, String)>,
    declarations: Vec<Declaration>,
    text: String,
    positions: Positions,
    ordinal: usize,
    children: SiblingCounters,
}

impl OpenElement {
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Zero-based index of the element among all elements, in document order.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Default)]
pub struct StreamedContext {
    open: Vec<OpenElement>,
    roots: SiblingCounters,
    started: usize,
}

impl StreamedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Number of elements started so far.
    pub fn started(&self) -> usize {
        self.started
    }

    /// Opens an element from its raw (prefixed) name and raw attributes, which
    /// may include namespace declarations.
    pub fn push_element(
        &mut self,
        raw_name: &str,
        raw_attributes: Vec<(String, String)>,
    ) -> Result<(), SourceError> {
        let mut declarations = Vec::new();
        let mut plain = Vec::new();
        for (key, value) in raw_attributes {
            if key == "xmlns" {
                declarations.push(Declaration {
                    prefix: None,
                    uri: value,
                });
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                declarations.push(Declaration {
                    prefix: Some(prefix.to_string()),
                    uri: value,
                });
            } else {
                plain.push((key, value));
            }
        }

        let (prefix, local_name) = split_name(raw_name);
        let namespace = match prefix {
            Some(p) => Some(self.resolve_prefix(p, &declarations, raw_name)?),
            None => self.default_namespace(&declarations),
        };

        let mut attributes = Vec::with_capacity(plain.len());
        for (key, value) in plain {
            let name = match split_name(&key) {
                (Some(p), local) => {
                    QualifiedName::with_namespace(self.resolve_prefix(p, &declarations, &key)?, local)
                }
                (None, local) => QualifiedName::new(local),
            };
            attributes.push((name, value));
        }

        let counters = match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        };
        let positions = counters.next(local_name, namespace.as_deref());

        log::trace!(
            "start <{}> depth={} ordinal={}",
            raw_name,
            self.open.len() + 1,
            self.started
        );
        self.open.push(OpenElement {
            local_name: local_name.to_string(),
            namespace,
            attributes,
            declarations,
            text: String::new(),
            positions,
            ordinal: self.started,
            children: SiblingCounters::default(),
        });
        self.started += 1;
        Ok(())
    }

    /// Appends character data to the innermost open element. Text outside the
    /// document element is dropped.
    pub fn append_text(&mut self, text: &str) {
        if let Some(current) = self.open.last_mut() {
            current.text.push_str(text);
        }
    }

    /// Closes the innermost element and returns it.
    pub fn pop_element(&mut self) -> Option<OpenElement> {
        self.open.pop()
    }

    /// The innermost open element, with its open ancestors.
    pub fn current(&self) -> Option<StreamElement<'_>> {
        StreamElement::new(&self.open)
    }

    fn resolve_prefix(
        &self,
        prefix: &str,
        own: &[Declaration],
        name: &str,
    ) -> Result<String, SourceError> {
        if prefix == "xml" {
            return Ok(XML_NAMESPACE.to_string());
        }
        let declared = own
            .iter()
            .rev()
            .chain(self.open.iter().rev().flat_map(|e| e.declarations.iter().rev()))
            .find(|d| d.prefix.as_deref() == Some(prefix));
        match declared {
            Some(d) if !d.uri.is_empty() => Ok(d.uri.clone()),
            _ => Err(SourceError::UnboundPrefix {
                prefix: prefix.to_string(),
                name: name.to_string(),
            }),
        }
    }

    fn default_namespace(&self, own: &[Declaration]) -> Option<String> {
        own.iter()
            .rev()
            .chain(self.open.iter().rev().flat_map(|e| e.declarations.iter().rev()))
            .find(|d| d.prefix.is_none())
            .filter(|d| !d.uri.is_empty())
            .map(|d| d.uri.clone())
    }
}

fn split_name(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, raw),
    }
}

/// A streamed element: the innermost element of an open chain.
#[derive(Debug, Clone, Copy)]
pub struct StreamElement<'s> {
    chain: &'s [OpenElement],
}

impl<'s> StreamElement<'s> {
    fn new(chain: &'s [OpenElement]) -> Option<Self> {
        if chain.is_empty() {
            None
        } else {
            Some(Self { chain })
        }
    }

    fn element(&self) -> &'s OpenElement {
        &self.chain[self.chain.len() - 1]
    }

    pub fn ordinal(&self) -> usize {
        self.element().ordinal
    }

    /// Number of open elements above this one.
    pub fn depth(&self) -> usize {
        self.chain.len() - 1
    }
}

impl ElementContext for StreamElement<'_> {
    fn local_name(&self) -> &str {
        &self.element().local_name
    }

    fn namespace_uri(&self) -> Option<&str> {
        self.element().namespace.as_deref()
    }

    fn attribute(&self, name: &QualifiedName) -> Option<&str> {
        self.element()
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.element().text)
    }

    fn parent(&self) -> Option<Self> {
        StreamElement::new(&self.chain[..self.chain.len() - 1])
    }

    fn position(&self, test: &NameTest) -> usize {
        let element = self.element();
        if !test.matches(&element.local_name, element.namespace.as_deref()) {
            return 0;
        }
        match test {
            NameTest::Any => element.positions.any,
            NameTest::Local(_) => element.positions.local,
            NameTest::Qualified(_) => element.positions.expanded,
        }
    }
}

impl StreamEvaluable for StreamElement<'_> {}
