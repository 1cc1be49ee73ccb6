//! Element selection for XML documents.
//!
//! A [`Filter`] holds named [`Selector`]s such as `/order/item[@qty > 5][1]`
//! and reports the elements they select. Documents can be read as a
//! materialized tree or streamed in a single pass; predicates are compiled
//! once into evaluator trees that run unchanged in both modes.
//!
//! ## Example
//!
//! ```
//! use xselect::FilterConfig;
//!
//! let config = FilterConfig::from_json(
//!     r#"{ "mode": "stream", "selectors": [{ "name": "big", "path": "item[@qty > 5]" }] }"#,
//! )?;
//! let filter = config.build()?;
//! let matches = filter.run(r#"<order><item qty="2"/><item qty="9"/></order>"#)?;
//! assert_eq!(matches[0].path, "/order[1]/item[2]");
//! # Ok::<(), xselect::SelectError>(())
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod selector;

pub use config::{EvaluationMode, FilterConfig, SelectorConfig};
pub use error::SelectError;
pub use filter::{Filter, Match, location_path};
pub use selector::Selector;

pub use xselect_evaluators as evaluators;
pub use xselect_source as source;
pub use xselect_xpath as xpath;
