//! Selector compilation and step-chain matching.
//!
//! A selector such as `/order/item[@type = 'book'][2]` is a chain of child
//! steps. Compiling it resolves each step's name test and builds one evaluator
//! per predicate. Matching starts at the candidate element (the last step) and
//! walks up one ancestor per step, so it only needs what a streamed element
//! can provide.
use crate::error::SelectError;
use std::sync::Arc;
use xselect_evaluators::{
    ElementContext, Evaluator, ExecutionContext, NameTest, Namespaces, ScopedContext,
    SelectorStep, StreamEvaluable, TreeEvaluable, build,
};
use xselect_xpath::{Axis, Expression, NodeTest, NodeTypeTest, Step, parse_expression};

#[derive(Debug, Clone)]
struct CompiledStep {
    step: Arc<SelectorStep>,
    predicates: Vec<Evaluator>,
}

#[derive(Debug, Clone)]
pub struct Selector {
    text: String,
    absolute: bool,
    /// Outermost step first.
    steps: Vec<CompiledStep>,
}

impl Selector {
    pub fn compile(text: &str, namespaces: &Namespaces) -> Result<Self, SelectError> {
        let invalid = |reason: &str| SelectError::InvalidSelector {
            selector: text.to_string(),
            reason: reason.to_string(),
        };

        let path = match parse_expression(text)? {
            Expression::Path(path) => path,
            other => {
                return Err(invalid(&format!(
                    "expected a location path, found a {} expression",
                    other.kind()
                )));
            }
        };

        let mut raw_steps: &[Step] = &path.steps;
        let mut absolute = path.is_absolute;
        if let Some((first, rest)) = raw_steps.split_first()
            && is_descendant_marker(first)
        {
            // `//a/b` matches `a/b` at any depth.
            raw_steps = rest;
            absolute = false;
        }
        if raw_steps.is_empty() {
            return Err(invalid("a selector needs at least one element step"));
        }

        let count = raw_steps.len();
        let mut steps = Vec::with_capacity(count);
        for (i, raw) in raw_steps.iter().enumerate() {
            if raw.axis != Axis::Child {
                return Err(invalid(&format!(
                    "step '{}' uses the {} axis; only child steps are supported",
                    raw,
                    raw.axis.as_str()
                )));
            }
            let name = match &raw.node_test {
                NodeTest::Wildcard => NameTest::Any,
                NodeTest::Name(name) => namespaces.element_test(name).ok_or_else(|| {
                    invalid(&format!("namespace prefix of '{}' is not bound", name))
                })?,
                NodeTest::NodeType(_) => {
                    return Err(invalid(&format!("step '{}' does not select elements", raw)));
                }
            };

            let step = Arc::new(SelectorStep::new(name, count - 1 - i));
            let predicates = raw
                .predicates
                .iter()
                .map(|p| build(p, &step, namespaces))
                .collect::<Result<Vec<_>, _>>()?;
            steps.push(CompiledStep { step, predicates });
        }

        log::debug!(
            "Compiled selector '{}' into {} step(s), {} predicate(s)",
            text,
            steps.len(),
            steps.iter().map(|s| s.predicates.len()).sum::<usize>()
        );
        Ok(Self {
            text: text.to_string(),
            absolute,
            steps,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn steps(&self) -> impl Iterator<Item = &SelectorStep> {
        self.steps.iter().map(|s| s.step.as_ref())
    }

    /// Whether any predicate reads element text.
    pub fn reads_text(&self) -> bool {
        self.steps
            .iter()
            .any(|s| s.predicates.iter().any(Evaluator::reads_text))
    }

    /// Tests `target` against the whole step chain.
    pub fn matches<E: ElementContext>(&self, target: E, exec: &ExecutionContext) -> bool {
        let mut ctx = ScopedContext::new(target);
        for compiled in self.steps.iter().rev() {
            let mut scoped = ctx.at_level(compiled.step.level());
            let named = scoped
                .current()
                .is_some_and(|e| compiled.step.matches_element(e));
            if !named {
                return false;
            }
            for predicate in &compiled.predicates {
                let evaluation = predicate.evaluate(scoped, exec);
                if !evaluation.matched {
                    return false;
                }
                scoped = evaluation.context;
            }
            ctx = scoped;
        }

        if self.absolute {
            let outermost = ctx.at_level(self.steps.len() - 1);
            return outermost.current().is_some_and(|e| e.parent().is_none());
        }
        true
    }

    pub fn matches_tree<E: TreeEvaluable>(&self, element: E, exec: &ExecutionContext) -> bool {
        self.matches(element, exec)
    }

    pub fn matches_stream<E: StreamEvaluable>(
        &self,
        element: E,
        exec: &ExecutionContext,
    ) -> bool {
        self.matches(element, exec)
    }
}

fn is_descendant_marker(step: &Step) -> bool {
    step.axis == Axis::DescendantOrSelf
        && step.node_test == NodeTest::NodeType(NodeTypeTest::Node)
        && step.predicates.is_empty()
}
