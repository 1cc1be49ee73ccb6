//! Evaluator trees run directly against roxmltree elements and streamed
//! elements of the same document.
mod common;

use common::fixtures::ORDERS;
use common::{TestResult, init_logging};
use std::sync::Arc;
use xselect::evaluators::{
    ElementContext, Evaluator, EvaluatorError, ExecutionContext, NameTest, Namespaces,
    QualifiedName, SelectorStep, build,
};
use xselect::source::{ElementVisitor, SourceError, StreamElement, XmlDocument, stream_document};
use xselect::xpath::parse_expression;

fn item_evaluator(text: &str, step: &Arc<SelectorStep>) -> Result<Evaluator, EvaluatorError> {
    let expr = parse_expression(text).map_err(|e| EvaluatorError::unsupported(text, e.to_string()))?;
    build(&expr, step, &Namespaces::new())
}

fn sku<E: ElementContext>(element: &E) -> String {
    element
        .attribute(&QualifiedName::new("sku"))
        .unwrap_or_default()
        .to_string()
}

fn tree_results(evaluator: &Evaluator) -> Result<Vec<(String, bool)>, SourceError> {
    let doc = XmlDocument::parse(ORDERS)?;
    let exec = ExecutionContext::new();
    Ok(doc
        .elements()
        .filter(|e| e.local_name() == "item")
        .map(|e| (sku(&e), evaluator.evaluate_tree(e, &exec)))
        .collect())
}

struct ItemCollector<'a> {
    evaluator: &'a Evaluator,
    exec: ExecutionContext,
    results: Vec<(String, bool)>,
}

impl ElementVisitor for ItemCollector<'_> {
    type Error = SourceError;

    fn start_element(&mut self, _element: StreamElement<'_>) -> Result<(), SourceError> {
        Ok(())
    }

    fn end_element(&mut self, element: StreamElement<'_>) -> Result<(), SourceError> {
        if element.local_name() == "item" {
            let matched = self.evaluator.evaluate_stream(element, &self.exec);
            self.results.push((sku(&element), matched));
        }
        Ok(())
    }
}

fn stream_results(evaluator: &Evaluator) -> Result<Vec<(String, bool)>, SourceError> {
    let mut collector = ItemCollector {
        evaluator,
        exec: ExecutionContext::new(),
        results: Vec::new(),
    };
    stream_document(ORDERS, &mut collector)?;
    Ok(collector.results)
}

fn item_step() -> Arc<SelectorStep> {
    Arc::new(SelectorStep::target(NameTest::Local("item".into())))
}

fn assert_modes_agree(text: &str, step: &Arc<SelectorStep>, expected: &[bool]) -> TestResult {
    let evaluator = item_evaluator(text, step)?;
    let tree = tree_results(&evaluator)?;
    let stream = stream_results(&evaluator)?;
    assert_eq!(tree, stream, "{}", text);
    let matched: Vec<bool> = tree.iter().map(|(_, m)| *m).collect();
    assert_eq!(matched, expected, "{}", text);
    Ok(())
}

// Items in document order: A1 (qty 2), B2 (qty 10), C3 (qty 1), A1 (qty 7, closed order).

#[test]
fn test_and_truth_table_in_both_modes() -> TestResult {
    init_logging();
    let step = item_step();
    assert_modes_agree("@sku = 'A1' and @qty = 2", &step, &[true, false, false, false])?;
    assert_modes_agree("@sku = 'A1' and @qty = 3", &step, &[false, false, false, false])?;
    assert_modes_agree("@sku = 'Z9' and @qty = 2", &step, &[false, false, false, false])?;
    assert_modes_agree("@sku = 'A1' and @qty > 1", &step, &[true, false, false, true])?;
    Ok(())
}

#[test]
fn test_or_truth_table_in_both_modes() -> TestResult {
    init_logging();
    let step = item_step();
    assert_modes_agree("@sku = 'B2' or @qty < 2", &step, &[false, true, true, false])?;
    assert_modes_agree("@sku = 'Z9' or @qty = 99", &step, &[false, false, false, false])?;
    Ok(())
}

#[test]
fn test_missing_attribute_in_both_modes() -> TestResult {
    init_logging();
    let step = item_step();
    assert_modes_agree("@x = 'v'", &step, &[false, false, false, false])?;
    assert_modes_agree("@x != 'v'", &step, &[true, true, true, true])?;
    assert_modes_agree("@price = ''", &step, &[false, false, true, false])?;
    Ok(())
}

#[test]
fn test_position_in_both_modes() -> TestResult {
    init_logging();
    let step = item_step();
    assert_modes_agree("1", &step, &[true, false, false, true])?;
    assert_modes_agree("3", &step, &[false, false, true, false])?;
    assert_modes_agree("4", &step, &[false, false, false, false])?;
    Ok(())
}

#[test]
fn test_ancestor_level_in_both_modes() -> TestResult {
    init_logging();
    let order = Arc::new(SelectorStep::new(NameTest::Local("order".into()), 1));
    assert_modes_agree("@status = 'open'", &order, &[true, true, true, false])?;
    assert_modes_agree("2", &order, &[false, false, false, true])?;
    // Past the document element: resolves empty rather than failing.
    let beyond = Arc::new(SelectorStep::new(NameTest::Any, 5));
    assert_modes_agree("@status = ''", &beyond, &[true, true, true, true])?;
    Ok(())
}

#[test]
fn test_text_operand_at_element_end() -> TestResult {
    init_logging();
    let step = item_step();
    assert_modes_agree("text() = 'Pen'", &step, &[true, false, false, true])?;
    assert_modes_agree(". != 'Pen' and ../@id = 'o1'", &step, &[false, true, true, false])?;
    Ok(())
}

#[test]
fn test_decimal_literals_in_both_modes() -> TestResult {
    init_logging();
    let step = item_step();
    assert_modes_agree("@price > 9.5", &step, &[false, true, false, false])?;
    assert_modes_agree("@price = 9.50", &step, &[true, false, false, true])?;
    assert_modes_agree("@qty > 1.5", &step, &[true, true, false, true])?;
    assert_modes_agree("2.5", &step, &[false, true, false, false])?;
    Ok(())
}

#[test]
fn test_ancestor_text_operand_is_rejected() {
    let step = item_step();
    for text in ["../text() = 'Alice'", "../. = 'x'"] {
        assert!(
            matches!(
                item_evaluator(text, &step),
                Err(EvaluatorError::UnsupportedExpression { .. })
            ),
            "{}",
            text
        );
    }
    let order = Arc::new(SelectorStep::new(NameTest::Local("order".into()), 1));
    assert!(item_evaluator("text() = 'x'", &order).is_err());
}
