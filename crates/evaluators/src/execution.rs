use std::cell::RefCell;
use std::collections::HashSet;

#[derive(Debug, Default)]
struct Warnings {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

/// Per-run session state passed through every evaluation.
///
/// Evaluators do not read anything from it; they only report warnings about
/// data that did not fit the comparison they were built for. A context belongs
/// to one run on one thread.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    label: Option<String>,
    warnings: RefCell<Warnings>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            warnings: RefCell::default(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Records a warning once; repeats of the same message are dropped.
    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        let mut warnings = self.warnings.borrow_mut();
        if warnings.seen.insert(message.clone()) {
            log::debug!(
                "[{}] {}",
                self.label.as_deref().unwrap_or("execution"),
                message
            );
            warnings.ordered.push(message);
        }
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().ordered.clone()
    }

    /// Drains the warnings in the order they were first reported.
    pub fn take_warnings(&self) -> Vec<String> {
        let mut warnings = self.warnings.borrow_mut();
        warnings.seen.clear();
        std::mem::take(&mut warnings.ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_are_deduplicated() {
        let exec = ExecutionContext::with_label("orders.xml");
        exec.warn("lexical comparison");
        exec.warn("lexical comparison");
        exec.warn("other");
        assert_eq!(exec.label(), Some("orders.xml"));
        assert_eq!(exec.warnings(), vec!["lexical comparison", "other"]);
        assert_eq!(exec.take_warnings().len(), 2);
        assert!(exec.warnings().is_empty());
    }

    #[test]
    fn test_taken_warnings_can_be_reported_again() {
        let exec = ExecutionContext::new();
        exec.warn("lexical comparison");
        exec.take_warnings();
        exec.warn("lexical comparison");
        assert_eq!(exec.warnings(), vec!["lexical comparison"]);
    }
}
