//! View to model: inline markup back into an attributed document.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smol_str::SmolStr;

use crate::attributes::{AttributeValue, Attributes};
use crate::document::Document;
use crate::error::ConversionError;
use crate::types::{PARAGRAPH_BREAK, Range};

use super::{Conversion, ViewElement};

const PARAGRAPH: &[u8] = b"p";

/// HTML elements that never have a closing tag.
const VOID_ELEMENTS: &[&[u8]] = &[b"br", b"hr", b"img", b"wbr"];

fn is_void(start: &BytesStart<'_>) -> bool {
    VOID_ELEMENTS.contains(&start.name().as_ref())
}

/// An open element and the attribute it contributes, if any.
struct Frame {
    name: String,
    attribute: Option<(SmolStr, AttributeValue)>,
}

/// HTML named entities outside the XML set that show up in editor output.
fn resolve_entity(entity: &str) -> Option<&'static str> {
    match entity {
        "nbsp" => Some("\u{a0}"),
        "zwj" => Some("\u{200D}"),
        _ => None,
    }
}

pub(super) fn parse(conversion: &Conversion, markup: &str) -> Result<Document, ConversionError> {
    let mut reader = Reader::from_str(markup);
    reader.trim_text(false);
    // `<br>` and friends have no end tag, so end names are matched here
    // against the open frames instead.
    reader.check_end_names(false);

    let mut stack: Vec<Frame> = Vec::new();
    let mut pieces: Vec<(String, Attributes)> = Vec::new();
    let mut paragraphs = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == PARAGRAPH => {
                open_paragraph(&mut pieces, &mut paragraphs);
                stack.push(Frame {
                    name: "p".to_owned(),
                    attribute: None,
                });
            }
            Event::Empty(e) if e.name().as_ref() == PARAGRAPH => {
                open_paragraph(&mut pieces, &mut paragraphs);
            }
            // Void inline elements carry no text.
            Event::Start(e) if is_void(&e) => {}
            Event::Start(e) => {
                let element = view_element(&e)?;
                let attribute = conversion.upcast_element(&element);
                if attribute.is_none() {
                    tracing::debug!(
                        target: "weaver::footnotes",
                        element = %element.name,
                        "no converter for element, keeping text only"
                    );
                }
                stack.push(Frame {
                    name: element.name.to_string(),
                    attribute,
                });
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if VOID_ELEMENTS.contains(&name.as_bytes()) {
                    continue;
                }
                match stack.pop() {
                    Some(frame) if frame.name == name => {}
                    Some(frame) => return Err(ConversionError::Mismatched(frame.name, name)),
                    None => return Err(ConversionError::UnexpectedEnd(name)),
                }
            }
            Event::Text(e) => {
                let text = e.unescape_with(resolve_entity)?;
                push_text(&mut pieces, &stack, text);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                push_text(&mut pieces, &stack, Cow::Owned(text));
            }
            Event::Eof => break,
            // Self-closed inline elements carry no text; comments and
            // declarations are not content.
            Event::Empty(_)
            | Event::Comment(_)
            | Event::Decl(_)
            | Event::PI(_)
            | Event::DocType(_) => {}
        }
    }

    if let Some(frame) = stack.pop() {
        return Err(ConversionError::Unclosed(frame.name));
    }

    let mut doc = Document::default();
    doc.change(|w| {
        for (text, attrs) in pieces {
            let end = w.document().len_chars();
            w.insert_content(&text, attrs, Range::caret(end));
        }
    });
    Ok(doc)
}

fn open_paragraph(pieces: &mut Vec<(String, Attributes)>, paragraphs: &mut usize) {
    if *paragraphs > 0 {
        pieces.push((PARAGRAPH_BREAK.to_string(), Attributes::new()));
    }
    *paragraphs += 1;
}

fn push_text(
    pieces: &mut Vec<(String, Attributes)>,
    stack: &[Frame],
    text: Cow<'_, str>,
) {
    // Formatting whitespace between top-level blocks.
    if stack.is_empty() && text.trim().is_empty() {
        return;
    }
    let attrs = stack
        .iter()
        .filter_map(|frame| frame.attribute.clone())
        .collect::<Attributes>();
    // Line breaks in markup source are whitespace; paragraphs come from `<p>`.
    let text = text.replace(PARAGRAPH_BREAK, " ");
    pieces.push((text, attrs));
}

fn view_element(start: &BytesStart<'_>) -> Result<ViewElement, ConversionError> {
    let mut element = ViewElement::new(String::from_utf8_lossy(start.name().as_ref()).as_ref());
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value_with(resolve_entity)?;
        element = element.with_attribute(key, value.as_ref());
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use crate::attributes::{AttributeValue, Attributes};
    use crate::conversion::{Conversion, FlagElementConverter, FootnoteConverter};
    use crate::error::ConversionError;

    fn conversion() -> Conversion {
        let mut conversion = Conversion::new();
        conversion
            .add(FootnoteConverter::default())
            .add(FlagElementConverter::new("bold", "strong").alias("b"));
        conversion
    }

    #[test]
    fn test_footnote_element_becomes_attribute() {
        let doc = conversion()
            .to_model(r#"<p>Hello<fn title="src1" class="footnote">note</fn> world</p>"#)
            .unwrap();
        assert_eq!(doc.content_string(), "Hellonote world");
        assert_eq!(
            doc.attributes_at(5).and_then(|a| a.get_text("footnotes")).map(|s| s.as_str()),
            Some("src1")
        );
        assert_eq!(doc.attributes_at(4), Some(&Attributes::new()));
        assert_eq!(doc.attributes_at(9), Some(&Attributes::new()));
    }

    #[test]
    fn test_fn_without_title_keeps_text_only() {
        let doc = conversion().to_model("<p>a<fn>b</fn>c</p>").unwrap();
        assert_eq!(doc.content_string(), "abc");
        assert_eq!(doc.runs().runs().len(), 1);
    }

    #[test]
    fn test_unknown_elements_are_transparent() {
        let doc = conversion()
            .to_model(r#"<p><span class="x"><b>bold</b></span> rest</p>"#)
            .unwrap();
        assert_eq!(doc.content_string(), "bold rest");
        let bold = Attributes::new().with("bold", AttributeValue::Flag);
        assert_eq!(doc.attributes_at(0), Some(&bold));
        assert_eq!(doc.attributes_at(4), Some(&Attributes::new()));
    }

    #[test]
    fn test_paragraphs_and_entities() {
        let doc = conversion()
            .to_model("<p>one&nbsp;&amp;</p>\n<p>two&#8205;</p><p/>")
            .unwrap();
        assert_eq!(doc.content_string(), "one\u{a0}&\ntwo\u{200D}\n");
    }

    #[test]
    fn test_nested_attributes_combine() {
        let doc = conversion()
            .to_model(r#"<p><fn title="t">a<strong>b</strong></fn></p>"#)
            .unwrap();
        let attrs = doc.attributes_at(1).unwrap();
        assert!(attrs.contains("bold"));
        assert_eq!(attrs.get_text("footnotes").map(|s| s.as_str()), Some("t"));
    }

    #[test]
    fn test_void_elements_do_not_open_frames() {
        let doc = conversion()
            .to_model(r#"<p>a<br>b<fn title="t">c<wbr>d</fn><img src="x.png"></p>"#)
            .unwrap();
        assert_eq!(doc.content_string(), "abcd");
        assert_eq!(doc.attributes_at(1), Some(&Attributes::new()));
        assert_eq!(
            doc.attributes_at(3).and_then(|a| a.get_text("footnotes")).map(|s| s.as_str()),
            Some("t")
        );

        let closed = conversion().to_model("<p>a<br/>b<br></br></p>").unwrap();
        assert_eq!(closed.content_string(), "ab");
    }

    #[test]
    fn test_source_newlines_inside_paragraph_are_spaces() {
        let doc = conversion()
            .to_model("<p>one\ntwo <fn title=\"t\">x\ny</fn></p>")
            .unwrap();
        assert_eq!(doc.content_string(), "one two x y");
        assert_eq!(doc.runs().runs().len(), 2);
    }

    #[test]
    fn test_mismatched_end_tag_is_an_error() {
        let err = conversion().to_model("<p><fn title=\"x\">a</p></fn>").unwrap_err();
        assert!(matches!(err, ConversionError::Mismatched(open, close) if open == "fn" && close == "p"));
    }

    #[test]
    fn test_unclosed_element_is_an_error() {
        let err = conversion().to_model("<p><fn title=\"x\">oops").unwrap_err();
        assert!(matches!(err, ConversionError::Unclosed(name) if name == "fn"));
    }
}
