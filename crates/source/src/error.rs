use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] roxmltree::Error),

    #[error("Quick-XML error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Unknown entity reference '&{0};'")]
    UnknownEntity(String),

    #[error("Namespace prefix '{prefix}' used by '{name}' is not declared")]
    UnboundPrefix { prefix: String, name: String },

    #[error("Unexpected end tag '{0}'")]
    UnexpectedEnd(String),

    #[error("Document ended with {0} unclosed element(s)")]
    Unclosed(usize),

    #[error("Document has no root element")]
    NoRootElement,
}
