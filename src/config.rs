//! JSON configuration for a [`Filter`].
//!
//! ```json
//! {
//!   "mode": "stream",
//!   "namespaces": { "ord": "urn:orders" },
//!   "selectors": [
//!     { "name": "cheap", "path": "/ord:order/ord:item[@price < 10]" }
//!   ]
//! }
//! ```
use crate::error::SelectError;
use crate::filter::Filter;
use crate::selector::Selector;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use xselect_evaluators::Namespaces;

/// How documents are read when a filter runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    /// Parse the whole document, then test every element. (Default)
    #[default]
    Tree,
    /// Test elements during a single pass, holding only the open ancestors.
    Stream,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    #[serde(default)]
    pub mode: EvaluationMode,
    #[serde(default)]
    pub namespaces: Namespaces,
    pub selectors: Vec<SelectorConfig>,
}

impl FilterConfig {
    pub fn from_json(json: &str) -> Result<Self, SelectError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compiles every selector. Fails on the first selector that does not
    /// compile, so a filter is never built with a subset of its selectors.
    pub fn build(&self) -> Result<Filter, SelectError> {
        if self.selectors.is_empty() {
            return Err(SelectError::Config("no selectors defined".to_string()));
        }
        let mut seen = HashSet::new();
        let mut filter = Filter::new(self.mode);
        for entry in &self.selectors {
            if !seen.insert(entry.name.as_str()) {
                return Err(SelectError::Config(format!(
                    "selector name '{}' is defined more than once",
                    entry.name
                )));
            }
            let selector = Selector::compile(&entry.path, &self.namespaces)?;
            filter = filter.with_selector(entry.name.clone(), selector);
        }
        log::debug!(
            "Built {:?} filter with {} selector(s) and {} namespace binding(s)",
            self.mode,
            self.selectors.len(),
            self.namespaces.len()
        );
        Ok(filter)
    }
}
