// src/error.rs
use thiserror::Error;
use xselect_evaluators::EvaluatorError;
use xselect_source::SourceError;
use xselect_xpath::XPathError;

/// Errors surfaced by selector compilation, configuration loading and filter runs.
#[derive(Error, Debug)]
pub enum SelectError {
    #[error("XPath parse error: {0}")]
    XPath(#[from] XPathError),

    #[error("Predicate error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("Document error: {0}")]
    Source(#[from] SourceError),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Configuration is invalid: {0}")]
    Config(String),
}
