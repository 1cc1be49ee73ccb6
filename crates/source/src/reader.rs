//! The quick-xml event loop behind streaming evaluation.
use crate::error::SourceError;
use crate::stream::{StreamElement, StreamedContext};
use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};

/// Receives elements as a document is read.
///
/// `start_element` sees the element's name, attributes and open ancestors, but
/// none of its text. `end_element` sees the same element with its direct text
/// complete, before it is closed.
pub trait ElementVisitor {
    type Error: From<SourceError>;

    fn start_element(&mut self, element: StreamElement<'_>) -> Result<(), Self::Error>;

    fn end_element(&mut self, element: StreamElement<'_>) -> Result<(), Self::Error>;
}

/// Reads `xml` in one pass, calling `visitor` for every element.
pub fn stream_document<V: ElementVisitor>(xml: &str, visitor: &mut V) -> Result<(), V::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut context = StreamedContext::new();

    loop {
        match reader.read_event().map_err(SourceError::from)? {
            Event::Start(e) => {
                open_element(&mut context, &e)?;
                if let Some(element) = context.current() {
                    visitor.start_element(element)?;
                }
            }
            Event::Empty(e) => {
                open_element(&mut context, &e)?;
                if let Some(element) = context.current() {
                    visitor.start_element(element)?;
                    visitor.end_element(element)?;
                }
                context.pop_element();
            }
            Event::End(e) => {
                match context.current() {
                    Some(element) => visitor.end_element(element)?,
                    None => {
                        let qname = e.name();
                        let name = std::str::from_utf8(qname.as_ref())
                            .map_err(SourceError::from)?
                            .to_string();
                        return Err(SourceError::UnexpectedEnd(name).into());
                    }
                }
                context.pop_element();
            }
            Event::Text(e) => {
                let raw = std::str::from_utf8(&e).map_err(SourceError::from)?;
                let text = unescape(raw).map_err(SourceError::from)?;
                context.append_text(&text);
            }
            Event::CData(e) => {
                let text = std::str::from_utf8(&e).map_err(SourceError::from)?;
                context.append_text(text);
            }
            Event::GeneralRef(e) => {
                let resolved = match e
                    .resolve_char_ref()
                    .map_err(|err| SourceError::UnknownEntity(err.to_string()))?
                {
                    Some(c) => c.to_string(),
                    None => {
                        let name = std::str::from_utf8(&e).map_err(SourceError::from)?;
                        resolve_predefined_entity(name)
                            .ok_or_else(|| SourceError::UnknownEntity(name.to_string()))?
                            .to_string()
                    }
                };
                context.append_text(&resolved);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if context.depth() > 0 {
        return Err(SourceError::Unclosed(context.depth()).into());
    }
    if context.started() == 0 {
        return Err(SourceError::NoRootElement.into());
    }
    log::debug!("Streamed {} elements", context.started());
    Ok(())
}

fn open_element(context: &mut StreamedContext, start: &BytesStart<'_>) -> Result<(), SourceError> {
    let qname = start.name();
    let name = std::str::from_utf8(qname.as_ref())?;
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = std::str::from_utf8(attribute.key.as_ref())?;
        let value = unescape(std::str::from_utf8(&attribute.value)?)?;
        attributes.push((key.to_string(), value.into_owned()));
    }
    context.push_element(name, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xselect_evaluators::{ElementContext, NameTest, QualifiedName};

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl ElementVisitor for Recorder {
        type Error = SourceError;

        fn start_element(&mut self, element: StreamElement<'_>) -> Result<(), SourceError> {
            let sku = element
                .attribute(&QualifiedName::new("sku"))
                .map(|s| format!(" sku={}", s))
                .unwrap_or_default();
            self.events.push(format!(
                "start {}#{} [{}]{}",
                element.local_name(),
                element.ordinal(),
                element.position(&NameTest::Any),
                sku
            ));
            Ok(())
        }

        fn end_element(&mut self, element: StreamElement<'_>) -> Result<(), SourceError> {
            self.events
                .push(format!("end {} '{}'", element.local_name(), element.text().trim()));
            Ok(())
        }
    }

    fn record(xml: &str) -> Result<Vec<String>, SourceError> {
        let mut recorder = Recorder::default();
        stream_document(xml, &mut recorder)?;
        Ok(recorder.events)
    }

    #[test]
    fn test_events_in_document_order() {
        let events = record(
            r#"<?xml version="1.0"?>
<order><item sku="A&amp;1">Pen &amp; ink</item><note/><item sku="B2"><![CDATA[<Lamp>]]></item></order>"#,
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                "start order#0 [1]",
                "start item#1 [1] sku=A&1",
                "end item 'Pen & ink'",
                "start note#2 [2]",
                "end note ''",
                "start item#3 [3] sku=B2",
                "end item '<Lamp>'",
                "end order ''",
            ]
        );
    }

    #[test]
    fn test_character_references() {
        let events = record("<a>&#65;&#x42;&lt;</a>").unwrap();
        assert_eq!(events[1], "end a 'AB<'");
    }

    #[test]
    fn test_malformed_documents() {
        assert!(record("<order><item></order>").is_err());
        assert!(record("<order><item>").is_err());
        assert!(matches!(record(""), Err(SourceError::NoRootElement)));
        assert!(record("<a>&bogus;</a>").is_err());
    }
}
