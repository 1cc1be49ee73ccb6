//! Predicate evaluators for selector steps.
//!
//! A predicate such as `[@type = 'book' and ../@status != 'closed']` is compiled
//! once per selector step by [`build`] into an [`Evaluator`] tree. The tree is
//! immutable and can then be evaluated against any element type implementing
//! [`ElementContext`]: a node of a fully materialized document, or the current
//! element of a streaming parse where only the open ancestors are known.

pub mod comparison;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod execution;
pub mod factory;
pub mod logical;
pub mod name;
pub mod operand;
pub mod positional;
pub mod step;

// Test utilities, public so downstream crates can reuse the mock tree.
pub mod testing;

pub use context::{
    ElementContext, Evaluation, ScopedContext, StreamEvaluable, TreeEvaluable, ancestor,
};
pub use error::EvaluatorError;
pub use evaluator::Evaluator;
pub use execution::ExecutionContext;
pub use factory::build;
pub use name::{NameTest, Namespaces, QualifiedName, XML_NAMESPACE};
pub use operand::{Operand, Value};
pub use step::SelectorStep;
