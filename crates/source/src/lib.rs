//! XML element sources for selector evaluation.
//!
//! ## Available Sources
//!
//! - [`XmlDocument`]: a fully parsed document (roxmltree). Every element is a
//!   [`TreeElement`] with access to its whole ancestor chain and siblings.
//! - [`stream_document`]: a single pass over the input (quick-xml). Each
//!   element is handed to an [`ElementVisitor`] as a [`StreamElement`] that
//!   only knows the elements currently open.

pub mod error;
pub mod reader;
pub mod stream;
pub mod tree;

pub use error::SourceError;
pub use reader::{ElementVisitor, stream_document};
pub use stream::{StreamElement, StreamedContext};
pub use tree::{TreeElement, XmlDocument};
