use thiserror::Error;

/// Errors raised while building an evaluator tree. Evaluation itself never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluatorError {
    #[error("Unsupported XPath expr token '{expression}': {reason}")]
    UnsupportedExpression { expression: String, reason: String },

    #[error("Ambiguous operand '{expression}': it does not resolve to a single value")]
    AmbiguousOperand { expression: String },
}

impl EvaluatorError {
    pub fn unsupported(expression: impl ToString, reason: impl Into<String>) -> Self {
        EvaluatorError::UnsupportedExpression {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}
