//! XML rendering of error documents using quick-xml.
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8" standalone="yes"?>
//! <error><source>iframely</source><code>408</code><message>Timeout</message></error>
//! ```
//!
//! Each sub-message becomes its own `<messages>` element.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::document::ErrorResponseDocument;
use super::RenderResult;

pub fn to_xml(document: &ErrorResponseDocument) -> RenderResult<Vec<u8>> {
    let body = &document.error;
    let mut writer = Writer::new(Vec::with_capacity(256));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), Some("yes"))))?;
    writer.write_event(Event::Start(BytesStart::new("error")))?;

    write_text_element(&mut writer, "source", &body.source)?;
    write_text_element(&mut writer, "code", &body.code.to_string())?;
    write_text_element(&mut writer, "message", &body.message)?;
    if let Some(messages) = &body.messages {
        for line in messages {
            write_text_element(&mut writer, "messages", line)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("error")))?;
    Ok(writer.into_inner())
}

/// `<name>text</name>`, text escaped
fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> RenderResult<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(doc: &ErrorResponseDocument) -> String {
        String::from_utf8(to_xml(doc).unwrap()).unwrap()
    }

    #[test]
    fn test_standalone_declaration_first() {
        let xml = render(&ErrorResponseDocument::new(408, "Timeout", None));
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?>"#));
    }

    #[test]
    fn test_full_document() {
        let xml = render(&ErrorResponseDocument::new(408, "Timeout", None));
        assert!(xml.ends_with(
            "<error><source>iframely</source><code>408</code><message>Timeout</message></error>"
        ));
        assert!(!xml.contains("<messages>"));
    }

    #[test]
    fn test_sub_messages_repeat_element() {
        let xml = render(&ErrorResponseDocument::new(
            404,
            "Link not found",
            Some(vec!["first".to_string(), "second".to_string()]),
        ));
        assert!(xml.contains("<messages>first</messages><messages>second</messages></error>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = render(&ErrorResponseDocument::new(
            415,
            "<script>a && b</script>",
            Some(vec!["x > y".to_string()]),
        ));

        assert!(xml.contains("<message>&lt;script&gt;a &amp;&amp; b&lt;/script&gt;</message>"));
        assert!(xml.contains("<messages>x &gt; y</messages>"));
        assert!(!xml.contains("<script>"));
    }
}
