#![allow(dead_code)]

pub mod fixtures;

use xselect::evaluators::Namespaces;
use xselect::{EvaluationMode, Filter, Match, SelectError, Selector};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Builds a filter from `(name, path)` pairs.
pub fn filter(
    mode: EvaluationMode,
    namespaces: &Namespaces,
    selectors: &[(&str, &str)],
) -> Result<Filter, SelectError> {
    selectors
        .iter()
        .try_fold(Filter::new(mode), |filter, (name, path)| {
            Ok(filter.with_selector(*name, Selector::compile(path, namespaces)?))
        })
}

/// Runs the same selectors in both modes and checks that they agree.
pub fn run_both(
    xml: &str,
    namespaces: &Namespaces,
    selectors: &[(&str, &str)],
) -> Result<Vec<Match>, SelectError> {
    let tree = filter(EvaluationMode::Tree, namespaces, selectors)?.run(xml)?;
    let stream = filter(EvaluationMode::Stream, namespaces, selectors)?.run(xml)?;
    assert_eq!(tree, stream, "tree and stream runs disagree for {:?}", selectors);
    Ok(tree)
}

/// `(selector, path)` pairs, for compact assertions.
pub fn paths(matches: &[Match]) -> Vec<(&str, &str)> {
    matches
        .iter()
        .map(|m| (m.selector.as_str(), m.path.as_str()))
        .collect()
}
