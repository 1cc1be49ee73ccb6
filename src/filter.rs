//! Running a set of named selectors over documents.
use crate::config::EvaluationMode;
use crate::error::SelectError;
use crate::selector::Selector;
use serde::Serialize;
use xselect_evaluators::{ElementContext, ExecutionContext, NameTest, QualifiedName};
use xselect_source::{ElementVisitor, StreamElement, XmlDocument, stream_document};

/// One element selected by one selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Match {
    /// Name of the selector that matched.
    pub selector: String,
    /// Location of the element, e.g. `/order[1]/item[2]`.
    pub path: String,
    /// Zero-based index of the element among all elements, in document order.
    pub ordinal: usize,
}

#[derive(Debug, Clone)]
struct NamedSelector {
    name: String,
    selector: Selector,
}

/// Compiled selectors plus the mode used to read documents.
///
/// A filter is immutable once built and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    mode: EvaluationMode,
    selectors: Vec<NamedSelector>,
}

impl Filter {
    pub fn new(mode: EvaluationMode) -> Self {
        Self {
            mode,
            selectors: Vec::new(),
        }
    }

    pub fn with_selector(mut self, name: impl Into<String>, selector: Selector) -> Self {
        self.selectors.push(NamedSelector {
            name: name.into(),
            selector,
        });
        self
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn selector(&self, name: &str) -> Option<&Selector> {
        self.selectors
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.selector)
    }

    /// Runs every selector over `xml` in the configured mode. Matches are in
    /// document order; an element matched by several selectors is reported
    /// once per selector, in selector order.
    pub fn run(&self, xml: &str) -> Result<Vec<Match>, SelectError> {
        let exec = ExecutionContext::with_label(format!("{:?}", self.mode).to_lowercase());
        let matches = self.run_with_context(xml, &exec)?;
        for warning in exec.take_warnings() {
            log::warn!("{}", warning);
        }
        Ok(matches)
    }

    pub fn run_with_context(
        &self,
        xml: &str,
        exec: &ExecutionContext,
    ) -> Result<Vec<Match>, SelectError> {
        match self.mode {
            EvaluationMode::Tree => self.run_tree(xml, exec),
            EvaluationMode::Stream => self.run_stream(xml, exec),
        }
    }

    /// Parses the whole document, then tests each element.
    pub fn run_tree(&self, xml: &str, exec: &ExecutionContext) -> Result<Vec<Match>, SelectError> {
        let doc = XmlDocument::parse(xml)?;
        let mut matches = Vec::new();
        for (ordinal, element) in doc.elements().enumerate() {
            for named in &self.selectors {
                if named.selector.matches_tree(element, exec) {
                    matches.push(Match {
                        selector: named.name.clone(),
                        path: location_path(&element),
                        ordinal,
                    });
                }
            }
        }
        log::debug!("Tree run matched {} element(s)", matches.len());
        Ok(matches)
    }

    /// Tests elements during a single pass. Selectors whose predicates read
    /// text are tested when the element ends, all others when it starts.
    pub fn run_stream(
        &self,
        xml: &str,
        exec: &ExecutionContext,
    ) -> Result<Vec<Match>, SelectError> {
        let mut matcher = StreamMatcher {
            selectors: &self.selectors,
            exec,
            found: Vec::new(),
        };
        stream_document(xml, &mut matcher)?;

        let mut found = matcher.found;
        found.sort_by_key(|(index, m)| (m.ordinal, *index));
        let matches: Vec<_> = found.into_iter().map(|(_, m)| m).collect();
        log::debug!("Stream run matched {} element(s)", matches.len());
        Ok(matches)
    }

    /// Runs the filter over many documents at once. Results are in input order.
    #[cfg(feature = "rayon-executor")]
    pub fn run_all(&self, documents: &[&str]) -> Vec<Result<Vec<Match>, SelectError>> {
        use rayon::prelude::*;
        documents.par_iter().map(|xml| self.run(xml)).collect()
    }

    /// Runs the filter over many documents. Results are in input order.
    #[cfg(not(feature = "rayon-executor"))]
    pub fn run_all(&self, documents: &[&str]) -> Vec<Result<Vec<Match>, SelectError>> {
        documents.iter().map(|xml| self.run(xml)).collect()
    }
}

struct StreamMatcher<'f> {
    selectors: &'f [NamedSelector],
    exec: &'f ExecutionContext,
    /// Selector index alongside each match, for ordering.
    found: Vec<(usize, Match)>,
}

impl StreamMatcher<'_> {
    fn test(&mut self, element: StreamElement<'_>, at_end: bool) {
        for (index, named) in self.selectors.iter().enumerate() {
            if named.selector.reads_text() != at_end {
                continue;
            }
            if named.selector.matches_stream(element, self.exec) {
                self.found.push((
                    index,
                    Match {
                        selector: named.name.clone(),
                        path: location_path(&element),
                        ordinal: element.ordinal(),
                    },
                ));
            }
        }
    }
}

impl ElementVisitor for StreamMatcher<'_> {
    type Error = SelectError;

    fn start_element(&mut self, element: StreamElement<'_>) -> Result<(), SelectError> {
        self.test(element, false);
        Ok(())
    }

    fn end_element(&mut self, element: StreamElement<'_>) -> Result<(), SelectError> {
        self.test(element, true);
        Ok(())
    }
}

/// `/order[1]/item[2]`: each step is indexed among the siblings with the same
/// local name and namespace.
pub fn location_path<E: ElementContext>(element: &E) -> String {
    let mut segments = Vec::new();
    let mut current = Some(element.clone());
    while let Some(e) = current {
        let exact = NameTest::Qualified(QualifiedName {
            namespace: e.namespace_uri().map(str::to_string),
            local_name: e.local_name().to_string(),
        });
        segments.push(format!("/{}[{}]", e.local_name(), e.position(&exact)));
        current = e.parent();
    }
    segments.reverse();
    segments.concat()
}
